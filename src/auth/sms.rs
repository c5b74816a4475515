//! OTP delivery over SMS.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use super::otp::to_e164_india;
use crate::config::TwilioConfig;

const TWILIO_API: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("invalid contact number `{0}`; expected a 10-digit Indian number")]
    InvalidNumber(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send_otp(&self, contact_no: &str, otp: &str) -> Result<(), SmsError>;
}

pub fn otp_message(otp: &str) -> String {
    format!("Your verification code is: {otp}. Valid for 5 minutes.")
}

/// Sends the code in the background; delivery failures never reach the client.
pub fn dispatch_otp(sender: Arc<dyn OtpSender>, contact_no: String, otp: String) {
    tokio::spawn(async move {
        if let Err(e) = sender.send_otp(&contact_no, &otp).await {
            warn!(error = %e, contact_no = %contact_no, "otp delivery failed");
        }
    });
}

/// Twilio Messages API client.
#[derive(Clone)]
pub struct TwilioSender {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSender {
    pub fn new(config: &TwilioConfig) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        })
    }
}

#[async_trait]
impl OtpSender for TwilioSender {
    async fn send_otp(&self, contact_no: &str, otp: &str) -> Result<(), SmsError> {
        let to = to_e164_india(contact_no).ok_or_else(|| SmsError::InvalidNumber(contact_no.to_string()))?;
        let url = format!("{TWILIO_API}/Accounts/{}/Messages.json", self.account_sid);
        let body = otp_message(otp);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to.as_str()), ("From", self.from_number.as_str()), ("Body", body.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SmsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        info!(to = %to, "otp sms sent");
        Ok(())
    }
}

/// Logs codes instead of sending them. Used when Twilio is not configured.
#[derive(Debug, Default, Clone)]
pub struct LogOnlySender;

#[async_trait]
impl OtpSender for LogOnlySender {
    async fn send_otp(&self, contact_no: &str, otp: &str) -> Result<(), SmsError> {
        let to = to_e164_india(contact_no).ok_or_else(|| SmsError::InvalidNumber(contact_no.to_string()))?;
        info!(to = %to, otp = %otp, "sms disabled; otp logged only");
        Ok(())
    }
}

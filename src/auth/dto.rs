use serde::{Deserialize, Serialize};

use super::repo_types::Account;
use crate::validate::opt_text;

/// Request body for admin registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    #[serde(default, deserialize_with = "opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub contact_no: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default, deserialize_with = "opt_text")]
    pub contact_no: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPhoneRequest {
    #[serde(default, deserialize_with = "opt_text")]
    pub contact_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub otp: Option<String>,
}

/// Request body for admin login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "opt_text")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Self-service profile edit for users. Absent fields stay as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfile {
    #[serde(default, deserialize_with = "opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub contact_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub address: Option<String>,
}

/// Self-service profile edit for admins.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminProfile {
    #[serde(default, deserialize_with = "opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub contact_no: Option<String>,
}

/// Outcome of `registerUser`: a fresh account, or a new code for a number
/// that already has one.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Registration {
    Created(Account),
    Resent {
        #[serde(rename = "otpResent")]
        otp_resent: bool,
    },
}

/// Response returned after OTP verification or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

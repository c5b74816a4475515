use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{Document, StoreError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Account record. Users sign up with a phone number and an OTP; admins with
/// a full profile and a password.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub contact_no: String,
    pub address: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub image: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<OffsetDateTime>,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewAdmin {
    pub name: String,
    pub gender: String,
    pub email: String,
    pub contact_no: String,
    pub password_hash: String,
}

impl Account {
    fn blank(contact_no: String, role: Role) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: None,
            gender: None,
            email: None,
            contact_no,
            address: None,
            password_hash: None,
            image: None,
            role,
            otp: None,
            otp_expires_at: None,
            is_admin: role == Role::Admin,
            created_at: now,
            updated_at: now,
        }
    }

    /// A user account waiting for its first OTP verification.
    pub fn pending_user(contact_no: String, otp: String, otp_expires_at: OffsetDateTime) -> Self {
        let mut account = Self::blank(contact_no, Role::User);
        account.otp = Some(otp);
        account.otp_expires_at = Some(otp_expires_at);
        account
    }

    pub fn admin(new: NewAdmin) -> Self {
        let mut account = Self::blank(new.contact_no, Role::Admin);
        account.name = Some(new.name);
        account.gender = Some(new.gender);
        account.email = Some(new.email);
        account.password_hash = Some(new.password_hash);
        account
    }

    pub fn issue_otp(&mut self, otp: String, expires_at: OffsetDateTime) {
        self.otp = Some(otp);
        self.otp_expires_at = Some(expires_at);
    }

    pub fn clear_otp(&mut self) {
        self.otp = None;
        self.otp_expires_at = None;
    }
}

impl Document for Account {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.created_at, self.updated_at)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }

    fn normalize(&mut self) -> Result<(), StoreError> {
        self.is_admin = self.role == Role::Admin;
        if let Some(email) = &mut self.email {
            *email = email.trim().to_lowercase();
        }
        let has_password = self.password_hash.as_deref().is_some_and(|p| !p.is_empty());
        if self.is_admin && !has_password {
            return Err(StoreError::Invalid(
                "Password is required for admin registration.".into(),
            ));
        }
        Ok(())
    }

    fn collides_with(&self, other: &Self) -> bool {
        let same_email = matches!(
            (&self.email, &other.email),
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(b)
        );
        same_email || self.contact_no == other.contact_no
    }
}

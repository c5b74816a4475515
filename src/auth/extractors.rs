use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::{jwt::JwtKeys, repo_types::Role};
use crate::error::AppError;

/// Caller identity recovered from the bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may act on any record; everyone else only on their own.
    pub fn ensure_self_or_admin(&self, owner: Uuid, message: &str) -> Result<(), AppError> {
        if self.is_admin() || self.id == owner {
            Ok(())
        } else {
            Err(AppError::forbidden(message))
        }
    }

    /// Ownership check that ignores role.
    pub fn ensure_self(&self, owner: Uuid, message: &str) -> Result<(), AppError> {
        if self.id == owner {
            Ok(())
        } else {
            Err(AppError::forbidden(message))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = match keys.verify(token.trim()) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(AppError::Unauthorized("Invalid or expired token".into()));
            }
        };

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Authenticated caller with the admin role.
#[derive(Debug)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            warn!(account_id = %user.id, "admin route refused");
            return Err(AppError::forbidden("Access denied. Admins only."));
        }
        Ok(Self(user))
    }
}

/// Authenticated caller with the user role.
#[derive(Debug)]
pub struct MemberUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for MemberUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::User {
            warn!(account_id = %user.id, "user route refused");
            return Err(AppError::forbidden("Access denied. Users only."));
        }
        Ok(Self(user))
    }
}

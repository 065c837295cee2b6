//! Authentication DTOs and the persisted refresh token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::users::validate_password_bytes;

/// Login request with username and password.
#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "admin")]
    pub username: String,
    #[validate(
        length(min = 1, message = "password is required"),
        custom(function = "validate_password_bytes")
    )]
    #[schema(example = "admin123")]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Tokens issued by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Request to exchange a refresh token for a new access token.
#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Request to revoke a refresh token.
#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

// Token strings are credentials; keep them out of span fields.
impl std::fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRequest").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for LogoutRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoutRequest").finish_non_exhaustive()
    }
}

/// A freshly issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenResponse {
    pub access_token: String,
}

/// A currently valid refresh token bound to its owner.
///
/// Created on login, deleted on logout, never updated in place. Its presence
/// in the store is the only thing that keeps a refresh token usable.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for RefreshTokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRecord")
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

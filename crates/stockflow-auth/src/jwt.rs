//! Token issuance and verification.
//!
//! The [`TokenManager`] signs two kinds of HS256 tokens with two distinct
//! secrets:
//!
//! - **Access tokens**: short-lived (`ACCESS_TOKEN_AGE`, default one hour),
//!   carry user id and role.
//! - **Refresh tokens**: valid for [`REFRESH_TOKEN_EXPIRY`] (30 days), carry
//!   user id and a random `jti`.
//!
//! Verification fails with [`AuthError::InvalidToken`] for every kind of
//! failure (bad signature, malformed token, wrong key, expired). A token is
//! expired from the second its `exp` is reached. The manager
//! has no persistent state; revocation lives in the refresh token store.
//!
//! # Example
//!
//! ```ignore
//! use stockflow_auth::TokenManager;
//! use stockflow_config::JwtConfig;
//!
//! let tokens = TokenManager::new(&JwtConfig::from_env()?);
//! let access = tokens.issue_access_token("user-42", UserRole::Staff)?;
//! let claims = tokens.verify_access_token(&access)?;
//! assert_eq!(claims.sub, "user-42");
//! ```

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use stockflow_config::JwtConfig;
use stockflow_core::{AuthError, UserRole};

use crate::claims::{AccessClaims, RefreshClaims};

/// Refresh token lifetime in seconds (30 days). Not configurable.
pub const REFRESH_TOKEN_EXPIRY: i64 = 30 * 24 * 60 * 60;

#[derive(Clone)]
pub struct TokenManager {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_token_expiry: i64,
    validation: Validation,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(jwt_config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // jsonwebtoken still accepts `exp == now`; `ensure_unexpired` closes that second.
        validation.leeway = 0;

        Self {
            access_encoding: EncodingKey::from_secret(jwt_config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(jwt_config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(jwt_config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(jwt_config.refresh_secret.as_bytes()),
            access_token_expiry: jwt_config.access_token_expiry,
            validation,
        }
    }

    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    /// Issues an access token for `user_id` with `role`, expiring after the configured lifetime.
    pub fn issue_access_token(&self, user_id: &str, role: UserRole) -> Result<String, AuthError> {
        self.issue_access_token_at(user_id, role, Utc::now().timestamp())
    }

    /// Issues an access token as if the current time were `issued_at`.
    pub fn issue_access_token_at(
        &self,
        user_id: &str,
        role: UserRole,
        issued_at: i64,
    ) -> Result<String, AuthError> {
        let claims = AccessClaims {
            sub: user_id.to_string(),
            role,
            exp: to_timestamp(issued_at + self.access_token_expiry),
            iat: to_timestamp(issued_at),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(|e| AuthError::internal(anyhow!("Failed to create access token: {}", e)))
    }

    /// Issues a refresh token for `user_id`, valid for [`REFRESH_TOKEN_EXPIRY`].
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, AuthError> {
        self.issue_refresh_token_at(user_id, Utc::now().timestamp())
    }

    /// Issues a refresh token as if the current time were `issued_at`.
    pub fn issue_refresh_token_at(&self, user_id: &str, issued_at: i64) -> Result<String, AuthError> {
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            exp: to_timestamp(issued_at + REFRESH_TOKEN_EXPIRY),
            iat: to_timestamp(issued_at),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding)
            .map_err(|e| AuthError::internal(anyhow!("Failed to create refresh token: {}", e)))
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let claims = decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)?;
        ensure_unexpired(claims.exp)?;
        Ok(claims)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let claims = decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)?;
        ensure_unexpired(claims.exp)?;
        Ok(claims)
    }
}

fn ensure_unexpired(exp: usize) -> Result<(), AuthError> {
    if exp as i64 <= Utc::now().timestamp() {
        return Err(AuthError::InvalidToken);
    }
    Ok(())
}

fn to_timestamp(seconds: i64) -> usize {
    seconds.max(0) as usize
}

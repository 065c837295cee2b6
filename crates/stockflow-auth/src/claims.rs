//! JWT claim structures for authentication tokens.
//!
//! - [`AccessClaims`]: Access token claims carrying user identity and role
//! - [`RefreshClaims`]: Refresh token claims carrying user identity only
//!
//! Claims are transient: they are produced by the
//! [`TokenManager`](crate::TokenManager) and consumed immediately. Only the raw
//! refresh token string is ever persisted.

use serde::{Deserialize, Serialize};
use stockflow_core::UserRole;
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: User ID (subject)
/// - `role`: Role at the time of issuance
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's role
    pub role: UserRole,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl AccessClaims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// JWT claims for refresh tokens.
///
/// Refresh tokens are long-lived and exchanged for new access tokens. The
/// role is deliberately absent: it is reloaded from the user store on every
/// refresh so role changes take effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Unique token identifier so two tokens issued in the same second differ
    pub jti: String,
}

impl RefreshClaims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_serialize() {
        let claims = AccessClaims {
            sub: "user-123".to_string(),
            role: UserRole::Manager,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-123""#));
        assert!(serialized.contains(r#""role":"manager""#));
    }

    #[test]
    fn test_access_claims_reject_unknown_role() {
        let json = r#"{"sub":"user-1","role":"root","exp":9999999999,"iat":9999999900}"#;
        assert!(serde_json::from_str::<AccessClaims>(json).is_err());
    }

    #[test]
    fn test_refresh_claims_deserialize() {
        let json = r#"{"sub":"user-456","exp":9999999999,"iat":9999999900,"jti":"abc"}"#;
        let claims: RefreshClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.user_id(), "user-456");
        assert_eq!(claims.jti, "abc");
    }
}

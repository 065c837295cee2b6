//! User domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockflow_core::{MAX_PASSWORD_BYTES, UserRole, can_approve, has_full_access};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A user in the system.
///
/// `password` holds the bcrypt hash once persisted and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub fullname: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a user that has not been persisted yet. Timestamps are
    /// placeholders; the store assigns the real ones.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        fullname: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            username: username.into(),
            password: password_hash.into(),
            fullname: fullname.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_approve(&self, amount: f64) -> bool {
        can_approve(self.role, amount)
    }

    pub fn has_full_access(&self) -> bool {
        has_full_access(self.role)
    }
}

/// Generates a new opaque user id of the form `user-<uuid>`.
pub fn generate_user_id() -> String {
    format!("user-{}", Uuid::new_v4())
}

/// Rejects passwords longer than bcrypt can hash. The limit is in bytes, not
/// characters.
pub fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long")
            .with_message(format!("password must be at most {} bytes", MAX_PASSWORD_BYTES).into()));
    }
    Ok(())
}

/// DTO for self-registration. `role` defaults to staff when absent.
#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(
        length(min = 1, message = "password is required"),
        custom(function = "validate_password_bytes")
    )]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1, message = "fullname is required"))]
    #[schema(example = "John Doe")]
    pub fullname: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl RegisterRequest {
    pub fn role_or_default(&self) -> UserRole {
        self.role.unwrap_or_default()
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("fullname", &self.fullname)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Public view of the acting user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub role: UserRole,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            role: user.role,
        }
    }
}

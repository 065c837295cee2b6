//! Error types for the Stockflow API.
//!
//! Two layers of errors are used:
//!
//! - [`AuthError`]: the closed set of domain failures produced by the
//!   authentication engine, the stores, and the authorization guards.
//! - [`AppError`]: the HTTP boundary type. Every [`AuthError`] converts into an
//!   [`AppError`] with the matching status code; internal failures are logged
//!   in full and answered with a generic message.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Domain failures of the authentication/session lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,

    #[error("username already used")]
    UsernameAlreadyUsed,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("refresh token not found")]
    RefreshTokenNotFound,

    #[error("invalid token")]
    InvalidToken,

    /// The request carries no usable identity. The message is sent to the client.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// The acting user may not perform the action. The message is sent to the client.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Unexpected collaborator failure (store unreachable, hashing primitive, encoding).
    #[error("internal error: {0}")]
    Internal(#[from] Error),
}

impl AuthError {
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        AuthError::Internal(err.into())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message.into()))
    }

    /// Message sent to the client. Server errors never expose their cause.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::unauthorized("Invalid credentials"),
            AuthError::InvalidToken | AuthError::RefreshTokenNotFound => {
                AppError::unauthorized("Invalid or expired refresh token")
            }
            AuthError::Unauthorized(message) => AppError::unauthorized(message),
            AuthError::UserNotFound => AppError::not_found(anyhow::anyhow!("User not found")),
            AuthError::UsernameAlreadyUsed => {
                AppError::conflict(anyhow::anyhow!("Username already used"))
            }
            AuthError::Forbidden(message) => AppError::forbidden(message),
            AuthError::Internal(e) => AppError::internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_label = if self.status.is_server_error() {
            tracing::error!(error = ?self.error, "Internal error");
            "error"
        } else {
            "fail"
        };

        let body = Json(json!({
            "status": status_label,
            "message": self.public_message(),
        }));

        (self.status, body).into_response()
    }
}

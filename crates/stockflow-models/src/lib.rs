//! # Stockflow Models
//!
//! Domain models and DTOs for the Stockflow API.
//!
//! # Modules
//!
//! - [`auth`]: Login, refresh and logout DTOs, the persisted refresh token record
//! - [`users`]: The user entity, registration and profile DTOs
//! - [`response`]: The `{"status": ..., "data"|"message": ...}` JSON envelope

pub mod auth;
pub mod response;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshTokenRecord, RefreshTokenRequest,
    RefreshTokenResponse,
};
pub use response::{DataResponse, MessageResponse};
pub use users::{RegisterRequest, User, UserProfile, generate_user_id};

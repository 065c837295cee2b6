//! # Stockflow Auth
//!
//! Token claims and the JWT token manager for the Stockflow API.
//!
//! This crate provides:
//!
//! - [`claims`]: JWT claim structures for access and refresh tokens
//! - [`jwt`]: The [`TokenManager`] that issues and verifies both token kinds
//!
//! # Token Types
//!
//! - **Access Token** ([`AccessClaims`]): Short-lived, carries user id and role
//! - **Refresh Token** ([`RefreshClaims`]): 30-day token exchanged for new access tokens
//!
//! The two kinds are signed with separate secrets, so a leaked access
//! signing key cannot forge refresh tokens and vice versa.

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{AccessClaims, RefreshClaims};
pub use jwt::{REFRESH_TOKEN_EXPIRY, TokenManager};

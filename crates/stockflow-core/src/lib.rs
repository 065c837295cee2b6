//! # Stockflow Core
//!
//! Core types, errors, and utilities for the Stockflow API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: The domain error taxonomy ([`AuthError`]) and the HTTP-facing [`AppError`]
//! - [`password`]: Salted, deliberately slow password hashing and verification
//! - [`permissions`]: The closed [`UserRole`] set and the authorization decision functions
//!
//! # Example
//!
//! ```ignore
//! use stockflow_core::{PasswordHasher, UserRole, can_approve};
//!
//! let hasher = PasswordHasher::new(12);
//! let hash = hasher.hash("secure_password")?;
//! assert!(hasher.verify(&hash, "secure_password")?);
//!
//! assert!(can_approve(UserRole::Staff, 10_000_000.0));
//! ```

pub mod errors;
pub mod password;
pub mod permissions;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use password::{DEFAULT_COST, MAX_PASSWORD_BYTES, PasswordHasher};
pub use permissions::{
    STAFF_APPROVAL_LIMIT, UnknownRole, UserRole, can_approve, has_full_access,
};

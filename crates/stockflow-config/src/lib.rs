//! # Stockflow Config
//!
//! Configuration types for the Stockflow API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Token signing secrets and lifetimes
//! - [`password`]: Password hashing work factor
//! - [`database`]: Connection pool and store deadline settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address
//!
//! Every config type has a `from_env()` constructor and a `from_lookup()`
//! constructor that takes any `Fn(&str) -> Option<String>`, which is what the
//! tests use instead of mutating the process environment.
//!
//! # Example
//!
//! ```ignore
//! use stockflow_config::{JwtConfig, DatabaseConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let db_config = DatabaseConfig::from_env()?;
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod password;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use server::ServerConfig;

/// Startup configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, String),
}

pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

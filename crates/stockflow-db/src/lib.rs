//! # Stockflow DB
//!
//! Persistence for the Stockflow API.
//!
//! - [`users`]: The [`UserStore`] contract and its PostgreSQL implementation
//! - [`refresh_tokens`]: The [`RefreshTokenStore`] contract and its PostgreSQL implementation
//! - [`memory`]: In-memory implementations of both contracts
//!
//! Every store operation touches exactly one record. Uniqueness (username,
//! refresh token value) is enforced by the store itself, and "not found" is
//! always reported as the matching domain error, distinct from a persistence
//! failure.
//!
//! # Example
//!
//! ```ignore
//! use stockflow_config::DatabaseConfig;
//! use stockflow_db::{init_db_pool, run_migrations, PgUserStore};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! let users = PgUserStore::new(pool.clone());
//! ```

pub mod memory;
pub mod refresh_tokens;
pub mod users;

pub use memory::{InMemoryRefreshTokenStore, InMemoryUserStore};
pub use refresh_tokens::{PgRefreshTokenStore, RefreshTokenStore};
pub use users::{PgUserStore, UserStore};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use stockflow_config::DatabaseConfig;

/// Migrations under the workspace `migrations/` directory, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Initializes a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and should be shared through the
/// application state.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.store_timeout)
        .connect(&config.url)
        .await
}

/// Applies every pending migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

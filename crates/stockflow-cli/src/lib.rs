//! # Stockflow CLI
//!
//! Administrative utilities used by the `stockflow-cli` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use stockflow_cli::seeder::seed_default_users;
//!
//! let users = PgUserStore::new(pool);
//! let report = seed_default_users(&users, PasswordHasher::default()).await?;
//! ```

pub mod seeder;

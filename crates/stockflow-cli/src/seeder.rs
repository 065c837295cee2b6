//! User seeding and creation.
//!
//! Works against any [`UserStore`], so the same code seeds PostgreSQL from
//! the binary and the in-memory store in tests.

use stockflow_core::{AuthError, PasswordHasher, UserRole};
use stockflow_db::UserStore;
use stockflow_models::{User, generate_user_id};
use tracing::info;

/// A user account created by `seed`.
#[derive(Debug, Clone, Copy)]
pub struct SeedAccount {
    pub username: &'static str,
    pub password: &'static str,
    pub fullname: &'static str,
    pub role: UserRole,
}

pub const DEFAULT_ACCOUNTS: [SeedAccount; 3] = [
    SeedAccount {
        username: "admin",
        password: "admin123",
        fullname: "Administrator",
        role: UserRole::Admin,
    },
    SeedAccount {
        username: "manager",
        password: "manager123",
        fullname: "Manager User",
        role: UserRole::Manager,
    },
    SeedAccount {
        username: "staff",
        password: "staff123",
        fullname: "Staff User",
        role: UserRole::Staff,
    },
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Hashes `password` and persists a new user.
pub async fn create_user(
    store: &dyn UserStore,
    hasher: PasswordHasher,
    username: &str,
    password: &str,
    fullname: &str,
    role: UserRole,
) -> Result<User, AuthError> {
    let password_hash = hasher.hash_async(password.to_string()).await?;
    let user = User::new(generate_user_id(), username, password_hash, fullname, role);
    store.create(&user).await
}

/// Creates each of `accounts` whose username is not taken yet. Existing
/// users are left untouched.
pub async fn seed_users(
    store: &dyn UserStore,
    hasher: PasswordHasher,
    accounts: &[SeedAccount],
) -> Result<SeedReport, AuthError> {
    let mut report = SeedReport::default();

    for account in accounts {
        match store.get_by_username(account.username).await {
            Ok(_) => {
                info!(username = account.username, "User already exists, skipping");
                report.skipped.push(account.username.to_string());
                continue;
            }
            Err(AuthError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        match create_user(
            store,
            hasher,
            account.username,
            account.password,
            account.fullname,
            account.role,
        )
        .await
        {
            Ok(user) => {
                info!(user_id = %user.id, username = account.username, role = %account.role, "Seeded user");
                report.created.push(account.username.to_string());
            }
            // Created concurrently between the lookup and the insert.
            Err(AuthError::UsernameAlreadyUsed) => {
                report.skipped.push(account.username.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

pub async fn seed_default_users(
    store: &dyn UserStore,
    hasher: PasswordHasher,
) -> Result<SeedReport, AuthError> {
    seed_users(store, hasher, &DEFAULT_ACCOUNTS).await
}

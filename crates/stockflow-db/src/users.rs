//! User persistence.

use async_trait::async_trait;
use sqlx::PgPool;
use stockflow_core::AuthError;
use stockflow_models::User;
use tracing::instrument;

const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Durable record of users, keyed by unique id and unique username.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists `user` with store-assigned timestamps.
    ///
    /// Fails with [`AuthError::UsernameAlreadyUsed`] on a username collision.
    async fn create(&self, user: &User) -> Result<User, AuthError>;

    async fn get_by_id(&self, id: &str) -> Result<User, AuthError>;

    async fn get_by_username(&self, username: &str) -> Result<User, AuthError>;

    /// Replaces username, password hash, fullname and role of the user with `user.id`.
    async fn update(&self, user: &User) -> Result<(), AuthError>;

    async fn delete(&self, id: &str) -> Result<(), AuthError>;
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_CONSTRAINT) {
            return AuthError::UsernameAlreadyUsed;
        }
    }
    AuthError::internal(err)
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user), fields(user_id = %user.id, username = %user.username))]
    async fn create(&self, user: &User) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password, fullname, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
             RETURNING id, username, password, fullname, role, created_at, updated_at",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.fullname)
        .bind(user.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, fullname, role, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::UserNotFound)
    }

    #[instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, fullname, role, created_at, updated_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::UserNotFound)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE users
             SET username = $2, password = $3, fullname = $4, role = $5, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.fullname)
        .bind(user.role.as_str())
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(AuthError::internal)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }
}

//! Refresh token persistence.
//!
//! The presence of a record is the only revocation signal: deleting it makes
//! the token unusable even though it is still cryptographically valid.
//! Expiry is never checked here; that is the token manager's job.

use async_trait::async_trait;
use sqlx::PgPool;
use stockflow_core::AuthError;
use stockflow_models::RefreshTokenRecord;
use tracing::{debug, instrument};

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Records `token` as valid for `user_id`, stamped with the current time.
    async fn add_token(&self, token: &str, user_id: &str) -> Result<(), AuthError>;

    /// Fails with [`AuthError::RefreshTokenNotFound`] when `token` is not recorded.
    async fn check_availability(&self, token: &str) -> Result<(), AuthError>;

    /// Removes `token`. Fails with [`AuthError::RefreshTokenNotFound`] when nothing was removed.
    async fn delete_token(&self, token: &str) -> Result<(), AuthError>;
}

#[derive(Clone, Debug)]
pub struct PgRefreshTokenStore {
    db: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    #[instrument(skip(self, token))]
    async fn add_token(&self, token: &str, user_id: &str) -> Result<(), AuthError> {
        sqlx::query("INSERT INTO authentications (token, user_id, created_at) VALUES ($1, $2, NOW())")
            .bind(token)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(AuthError::internal)?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn check_availability(&self, token: &str) -> Result<(), AuthError> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT token, user_id, created_at FROM authentications WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::RefreshTokenNotFound)?;

        debug!(user_id = %record.user_id, "Refresh token is available");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn delete_token(&self, token: &str) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM authentications WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await
            .map_err(AuthError::internal)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::RefreshTokenNotFound);
        }

        Ok(())
    }
}

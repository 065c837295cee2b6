use std::sync::Arc;

use stockflow_auth::TokenManager;
use stockflow_config::{CorsConfig, DatabaseConfig, JwtConfig, PasswordConfig};
use stockflow_core::PasswordHasher;
use stockflow_db::{PgRefreshTokenStore, PgUserStore, init_db_pool, run_migrations};

use crate::modules::auth::service::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: AuthService,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(auth: AuthService, cors_config: CorsConfig) -> Self {
        Self { auth, cors_config }
    }
}

/// Builds the application state from the environment: validates the token
/// secrets, connects to PostgreSQL and applies pending migrations.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env()?;
    let password_config = PasswordConfig::from_env();
    let db_config = DatabaseConfig::from_env()?;

    let pool = init_db_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let auth = AuthService::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgRefreshTokenStore::new(pool)),
        TokenManager::new(&jwt_config),
        PasswordHasher::new(password_config.cost),
        db_config.store_timeout,
    );

    Ok(AppState::new(auth, CorsConfig::from_env()))
}

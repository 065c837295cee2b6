use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use stockflow_auth::{AccessClaims, TokenManager};
use stockflow_core::{AuthError, PasswordHasher};
use stockflow_db::{RefreshTokenStore, UserStore};
use stockflow_models::{LoginResponse, RefreshTokenResponse, RegisterRequest, User, generate_user_id};
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

/// Hashed once per service and verified against when the username is
/// unknown, so both login failures pay the same bcrypt cost.
const DUMMY_PASSWORD: &str = "stockflow-login-timing-equalizer";

/// Orchestrates login, token refresh, logout and registration.
///
/// Holds no state of its own beyond handles to its collaborators, so it is
/// cheap to clone and safe to call from any number of concurrent requests.
/// Every store call runs under `store_timeout`; a call that overruns is
/// abandoned and reported as an internal error.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    tokens: TokenManager,
    hasher: PasswordHasher,
    store_timeout: Duration,
    dummy_hash: Arc<OnceCell<String>>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .field("hasher", &self.hasher)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        tokens: TokenManager,
        hasher: PasswordHasher,
        store_timeout: Duration,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
            hasher,
            store_timeout,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    async fn with_deadline<T, F>(&self, call: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                AuthError::internal(anyhow!(
                    "store call exceeded deadline of {:?}",
                    self.store_timeout
                ))
            })?
    }

    /// Runs a full password verification against a throwaway hash.
    async fn verify_against_dummy(&self, password: &str) -> Result<(), AuthError> {
        let dummy_hash = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash_async(DUMMY_PASSWORD.to_string()))
            .await?;
        self.hasher
            .verify_async(dummy_hash.clone(), password.to_string())
            .await?;
        Ok(())
    }

    /// Verifies credentials and issues a fresh access/refresh token pair.
    ///
    /// An unknown username and a wrong password both yield
    /// [`AuthError::InvalidCredentials`] after one bcrypt verification.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user = match self.with_deadline(self.users.get_by_username(username)).await {
            Ok(user) => user,
            Err(AuthError::UserNotFound) => {
                self.verify_against_dummy(password).await?;
                warn!("Login failed: invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let matches = self
            .hasher
            .verify_async(user.password.clone(), password.to_string())
            .await?;
        if !matches {
            warn!("Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue_access_token(&user.id, user.role)?;
        let refresh_token = self.tokens.issue_refresh_token(&user.id)?;

        self.with_deadline(self.refresh_tokens.add_token(&refresh_token, &user.id))
            .await?;

        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a valid, unrevoked refresh token for a new access token.
    ///
    /// The role is reloaded from the user store, so a role change takes
    /// effect on the next refresh. The refresh token itself is not rotated.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshTokenResponse, AuthError> {
        let claims = self.tokens.verify_refresh_token(refresh_token)?;

        self.with_deadline(self.refresh_tokens.check_availability(refresh_token))
            .await?;

        let user = self
            .with_deadline(self.users.get_by_id(claims.user_id()))
            .await?;

        let access_token = self.tokens.issue_access_token(&user.id, user.role)?;

        info!(user_id = %user.id, "Access token refreshed");

        Ok(RefreshTokenResponse { access_token })
    }

    /// Revokes a refresh token. The token must verify before it is deleted.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.tokens.verify_refresh_token(refresh_token)?;

        self.with_deadline(self.refresh_tokens.delete_token(refresh_token))
            .await?;

        info!(user_id = %claims.user_id(), "User logged out");

        Ok(())
    }

    /// Creates a user with a hashed password and the requested role (staff when absent).
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let role = request.role_or_default();
        let password_hash = self.hasher.hash_async(request.password).await?;

        let user = User::new(
            generate_user_id(),
            request.username,
            password_hash,
            request.fullname,
            role,
        );

        let user = self.with_deadline(self.users.create(&user)).await?;

        info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(user)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.tokens.verify_access_token(token)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<User, AuthError> {
        self.with_deadline(self.users.get_by_id(user_id)).await
    }
}

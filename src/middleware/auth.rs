use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use stockflow_core::{AppError, AuthError, UserRole, can_approve, has_full_access};
use stockflow_models::UserProfile;

use crate::state::AppState;

/// The acting user of a request, reloaded from the user store after the
/// access token verified.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn can_approve(&self, amount: f64) -> bool {
        can_approve(self.0.role, amount)
    }

    pub fn has_full_access(&self) -> bool {
        has_full_access(self.0.role)
    }
}

/// Extractor that yields the authenticated [`CurrentUser`].
///
/// Uses the user placed in the request extensions by [`require_auth`] when
/// present, otherwise authenticates the `Authorization: Bearer` header itself.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(AuthUser(user.clone()));
        }

        let user = authenticate(parts, state).await?;
        parts.extensions.insert(user.clone());

        Ok(AuthUser(user))
    }
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<CurrentUser, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthorized("Invalid authorization header format"))?;

    let claims = state
        .auth
        .verify_access_token(token)
        .map_err(|_| AuthError::Unauthorized("Invalid or expired token"))?;

    let user = match state.auth.get_user(claims.user_id()).await {
        Ok(user) => user,
        Err(AuthError::UserNotFound) => return Err(AuthError::Unauthorized("User not found")),
        Err(e) => return Err(e),
    };

    Ok(CurrentUser(UserProfile::from(&user)))
}

/// Middleware that rejects unauthenticated requests and makes the
/// [`CurrentUser`] available to everything behind it.
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &state).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use stockflow_auth::TokenManager;
    use stockflow_config::{CorsConfig, JwtConfig};
    use stockflow_core::PasswordHasher;
    use stockflow_db::{InMemoryRefreshTokenStore, InMemoryUserStore};

    use super::*;
    use crate::modules::auth::service::AuthService;

    fn test_state() -> AppState {
        let auth = AuthService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryRefreshTokenStore::new()),
            TokenManager::new(&JwtConfig {
                access_secret: "middleware-test-access-secret".to_string(),
                refresh_secret: "middleware-test-refresh-secret".to_string(),
                access_token_expiry: 3600,
            }),
            PasswordHasher::new(4),
            Duration::from_secs(5),
        );
        AppState::new(
            auth,
            CorsConfig {
                allowed_origins: vec![],
            },
        )
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_unauthorized() {
        let state = test_state();
        let cases = [
            (None, "Missing authorization header"),
            (Some("Token abc"), "Invalid authorization header format"),
            (Some("Bearer abc"), "Invalid or expired token"),
        ];

        for (value, expected) in cases {
            let err = authenticate(&parts_with_header(value), &state)
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::Unauthorized(message) if message == expected));
        }
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let state = test_state();
        let token = state
            .auth
            .tokens()
            .issue_access_token("user-gone", UserRole::Admin)
            .unwrap();

        let err = authenticate(&parts_with_header(Some(&format!("Bearer {}", token))), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized("User not found")));

        let response = AppError::from(err);
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
}

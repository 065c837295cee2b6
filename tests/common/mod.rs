use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use stockflow::modules::auth::service::AuthService;
use stockflow::router::init_router;
use stockflow::state::AppState;
use stockflow_auth::TokenManager;
use stockflow_config::{CorsConfig, JwtConfig};
use stockflow_core::{PasswordHasher, UserRole};
use stockflow_db::{InMemoryRefreshTokenStore, InMemoryUserStore};
use stockflow_models::RegisterRequest;
use tower::ServiceExt;
use uuid::Uuid;

pub const ACCESS_SECRET: &str = "integration-access-secret-0123456789";
pub const REFRESH_SECRET: &str = "integration-refresh-secret-9876543210";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: ACCESS_SECRET.to_string(),
        refresh_secret: REFRESH_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

/// Application wired to in-memory stores, with handles on the stores so
/// tests can inspect or mutate them directly.
#[allow(dead_code)]
pub struct TestApp {
    pub state: AppState,
    pub users: Arc<InMemoryUserStore>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenStore>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());

        let auth = AuthService::new(
            users.clone(),
            refresh_tokens.clone(),
            TokenManager::new(&test_jwt_config()),
            PasswordHasher::new(4),
            Duration::from_secs(5),
        );

        let state = AppState::new(
            auth,
            CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
        );

        Self {
            state,
            users,
            refresh_tokens,
        }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    pub fn auth(&self) -> &AuthService {
        &self.state.auth
    }

    /// Registers a user directly through the service and returns its id.
    pub async fn create_user(&self, username: &str, password: &str, role: UserRole) -> String {
        self.auth()
            .register(RegisterRequest {
                username: username.to_string(),
                password: password.to_string(),
                fullname: format!("{} user", username),
                role: Some(role),
            })
            .await
            .unwrap()
            .id
    }

    /// Logs in through the service and returns `(access_token, refresh_token)`.
    pub async fn login(&self, username: &str, password: &str) -> (String, String) {
        let tokens = self.auth().login(username, password).await.unwrap();
        (tokens.access_token, tokens.refresh_token)
    }
}

#[allow(dead_code)]
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

#[allow(dead_code)]
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn authorized_request(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends `request` through `router` and returns the status and JSON body.
#[allow(dead_code)]
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response<Body> = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

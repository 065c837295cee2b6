use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use stockflow_core::AppError;
use stockflow_models::{
    DataResponse, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, UserProfile,
};
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Error envelope returned by every endpoint.
#[derive(ToSchema)]
pub struct ErrorResponse {
    /// `fail` for client errors, `error` for server errors
    pub status: String,
    pub message: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 409, description = "Username already used", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state.auth.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::success("User registered successfully")),
    ))
}

/// Login and receive an access token and a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = DataResponse<LoginResponse>),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<DataResponse<LoginResponse>>, AppError> {
    let tokens = state.auth.login(&dto.username, &dto.password).await?;
    Ok(Json(DataResponse::success(tokens)))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    put,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Access token refreshed", body = DataResponse<RefreshTokenResponse>),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid, expired or revoked refresh token", body = ErrorResponse),
        (status = 404, description = "Token owner no longer exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<DataResponse<RefreshTokenResponse>>, AppError> {
    let response = state.auth.refresh_token(&dto.refresh_token).await?;
    Ok(Json(DataResponse::success(response)))
}

/// Revoke a refresh token
#[utoipa::path(
    delete,
    path = "/api/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Successfully logged out", body = MessageResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid or already revoked refresh token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn logout_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LogoutRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.logout(&dto.refresh_token).await?;
    Ok(Json(MessageResponse::success("Successfully logged out")))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user profile", body = DataResponse<UserProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.0.id()))]
pub async fn get_profile(auth_user: AuthUser) -> Json<DataResponse<UserProfile>> {
    let AuthUser(user) = auth_user;
    Json(DataResponse::success(user.0))
}

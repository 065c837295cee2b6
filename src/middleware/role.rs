//! Role and spend-limit authorization middleware.
//!
//! Both guards authenticate the request first (reusing the user resolved by
//! `require_auth` when it already ran), then apply a decision function from
//! `stockflow_core::permissions`.
//!
//! ```rust,ignore
//! use axum::{Router, middleware, routing::post};
//! use crate::middleware::role::{require_approval, require_full_access};
//!
//! let purchases = Router::new()
//!     .route("/approve", post(approve_purchase))
//!     .route_layer(middleware::from_fn_with_state(
//!         state.clone(),
//!         |s: State<AppState>, r: Request, n: Next| require_approval(s, r, n, "total_amount"),
//!     ));
//!
//! let reports = Router::new()
//!     .route("/", get(list_reports))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_full_access));
//! ```

use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use stockflow_core::{AppError, AuthError, UserRole};

use crate::middleware::auth::{AuthUser, CurrentUser};
use crate::state::AppState;

/// Largest request body the approval guard will buffer.
const MAX_APPROVAL_BODY_BYTES: usize = 1024 * 1024;

const APPROVAL_LIMIT_MESSAGE: &str =
    "You cannot approve purchases over 10,000,000. Please contact Admin/Manager";

/// Returns `Forbidden` unless the user's role is one of `allowed_roles`.
pub fn check_any_role(user: &CurrentUser, allowed_roles: &[UserRole]) -> Result<(), AuthError> {
    if allowed_roles.contains(&user.role()) {
        Ok(())
    } else {
        Err(AuthError::Forbidden("Insufficient permissions"))
    }
}

/// Returns `Forbidden` unless the user may approve a purchase of `amount`.
pub fn check_approval(user: &CurrentUser, amount: f64) -> Result<(), AuthError> {
    if user.can_approve(amount) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(APPROVAL_LIMIT_MESSAGE))
    }
}

/// Reads `amount_field` from a JSON request body.
fn extract_amount(body: &[u8], amount_field: &str) -> Result<f64, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid request body")))?;

    value
        .get(amount_field)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid amount field")))
}

/// Middleware that lets the request through only for users holding one of
/// `allowed_roles`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &'static [UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &state).await?;

    check_any_role(&user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin and manager only.
pub async fn require_full_access(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(
        State(state),
        req,
        next,
        &[UserRole::Admin, UserRole::Manager],
    )
    .await
}

/// Middleware that checks the numeric `amount_field` of the JSON body
/// against the acting user's approval limit. The body is forwarded unchanged.
pub async fn require_approval(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    amount_field: &'static str,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &state).await?;

    let bytes = to_bytes(body, MAX_APPROVAL_BODY_BYTES)
        .await
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid request body")))?;

    let amount = extract_amount(&bytes, amount_field)?;
    check_approval(&user, amount)?;

    Ok(next
        .run(Request::from_parts(parts, Body::from(bytes)))
        .await)
}

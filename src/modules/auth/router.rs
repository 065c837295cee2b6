use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::controller::{get_profile, login_user, logout_user, refresh_token, register_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", put(refresh_token))
        .route("/logout", delete(logout_user))
        .route("/profile", get(get_profile))
}

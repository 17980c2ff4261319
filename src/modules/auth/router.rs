use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    blacklist_token, change_password, get_me, login_user, logout_user, obtain_token_pair,
    refresh_token, reset_password, set_new_password, verify_otp, verify_token,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/refresh", post(refresh_token))
        .route("/me", get(get_me))
        .route("/change-password", post(change_password))
        .route("/reset-password", post(reset_password))
        .route("/verify-otp", post(verify_otp))
        .route("/set-new-password", post(set_new_password))
}

pub fn init_token_router() -> Router<AppState> {
    Router::new()
        .route("/", post(obtain_token_pair))
        .route("/refresh", post(refresh_token))
        .route("/verify", post(verify_token))
        .route("/blacklist", post(blacklist_token))
}

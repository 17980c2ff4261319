use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_superuser, create_user, delete_user, get_user, get_users, update_user,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/superuser", post(create_superuser))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

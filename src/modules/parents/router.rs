use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_parent, delete_parent, get_parent, get_parents, update_parent};

pub fn init_parents_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_parents).post(create_parent))
        .route(
            "/{id}",
            get(get_parent).put(update_parent).delete(delete_parent),
        )
}

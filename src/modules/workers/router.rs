use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_worker, delete_worker, get_worker, get_workers, update_worker};

pub fn init_workers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_workers).post(create_worker))
        .route(
            "/{id}",
            get(get_worker).put(update_worker).delete(delete_worker),
        )
}

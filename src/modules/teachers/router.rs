use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_teacher, delete_teacher, get_teacher, get_teacher_groups, get_teachers,
    get_teachers_by_ids, update_teacher,
};

/// Retrieval of a single teacher uses owner-aware checks; every other
/// route is admin-only.
pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_teachers).post(create_teacher))
        .route("/by-ids", post(get_teachers_by_ids))
        .route(
            "/{id}",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/{id}/groups", get(get_teacher_groups))
}

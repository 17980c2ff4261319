use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    add_student, add_teacher, create_group, delete_group, get_group, get_groups, remove_student,
    remove_teacher, update_group,
};

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_groups).post(create_group))
        .route(
            "/{id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route("/{id}/students/add", post(add_student))
        .route("/{id}/students/remove", post(remove_student))
        .route("/{id}/teachers/add", post(add_teacher))
        .route("/{id}/teachers/remove", post(remove_teacher))
}

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_student, delete_student, get_statistics, get_student, get_student_attendances,
    get_student_groups, get_students, register_student, update_student,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route("/register", post(register_student))
        .route("/statistics", post(get_statistics))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{id}/attendances", get(get_student_attendances))
        .route("/{id}/groups", get(get_student_groups))
}

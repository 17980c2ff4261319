use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_course, create_department, delete_course, delete_department, get_course, get_courses,
    get_department, get_departments, update_course, update_department,
};

pub fn init_departments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_departments).post(create_department))
        .route(
            "/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
}

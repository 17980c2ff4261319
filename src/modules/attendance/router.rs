use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_attendance, create_level, create_status, delete_attendance, delete_level,
    delete_status, get_attendance, get_attendances, get_level, get_levels, get_status,
    get_statuses, update_attendance, update_level, update_status,
};

/// `/attendances`, with the level lookup table nested under `/levels`.
pub fn init_attendances_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_attendances).post(create_attendance))
        .route("/levels", get(get_levels).post(create_level))
        .route(
            "/levels/{id}",
            get(get_level).put(update_level).delete(delete_level),
        )
        .route(
            "/{id}",
            get(get_attendance)
                .put(update_attendance)
                .delete(delete_attendance),
        )
}

pub fn init_statuses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_statuses).post(create_status))
        .route(
            "/{id}",
            get(get_status).put(update_status).delete(delete_status),
        )
}

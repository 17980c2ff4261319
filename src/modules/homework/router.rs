use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_group_homework, create_submission, create_topic, delete_group_homework,
    delete_submission, delete_topic, get_group_homework, get_group_homeworks, get_submission,
    get_submissions, get_topic, get_topics, update_group_homework, update_submission,
    update_topic,
};

pub fn init_topics_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_topics).post(create_topic))
        .route(
            "/{id}",
            get(get_topic).put(update_topic).delete(delete_topic),
        )
}

/// Homework assigned to groups.
pub fn init_reviews_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_group_homeworks).post(create_group_homework))
        .route(
            "/{id}",
            get(get_group_homework)
                .put(update_group_homework)
                .delete(delete_group_homework),
        )
}

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_submissions).post(create_submission))
        .route(
            "/{id}",
            get(get_submission)
                .put(update_submission)
                .delete(delete_submission),
        )
}

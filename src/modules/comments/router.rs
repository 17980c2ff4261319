use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_comment, delete_comment, get_comment, get_comments, update_comment,
};

pub fn init_comments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_comments).post(create_comment))
        .route(
            "/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}

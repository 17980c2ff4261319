use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::comments::{Comment, CreateCommentDto, UpdateCommentDto};
use campusdesk_models::{CommentId, UserId};
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::comments::service::CommentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_comments(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Comment>>, AppError> {
    Ok(Json(CommentService::get_comments(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_comment(
    State(state): State<AppState>,
    RequireAdmin(guard): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let author = UserId::new(guard.principal()?.user_id);
    let comment = CommentService::create_comment(&state.db, author, dto).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[instrument(skip(state))]
pub async fn get_comment(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<CommentId>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(CommentService::get_comment(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_comment(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<CommentId>,
    ValidatedJson(dto): ValidatedJson<UpdateCommentDto>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(CommentService::update_comment(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<CommentId>,
) -> Result<StatusCode, AppError> {
    CommentService::delete_comment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

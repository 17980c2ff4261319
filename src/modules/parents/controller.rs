use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::ParentId;
use campusdesk_models::parents::{CreateParentDto, Parent, UpdateParentDto};
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::parents::service::ParentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_parents(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Parent>>, AppError> {
    Ok(Json(ParentService::get_parents(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_parent(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<(StatusCode, Json<Parent>), AppError> {
    let parent = ParentService::create_parent(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(parent)))
}

#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<ParentId>,
) -> Result<Json<Parent>, AppError> {
    Ok(Json(ParentService::get_parent(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_parent(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<ParentId>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<Json<Parent>, AppError> {
    Ok(Json(ParentService::update_parent(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_parent(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<ParentId>,
) -> Result<StatusCode, AppError> {
    ParentService::delete_parent(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::WorkerId;
use campusdesk_models::staff::{CreateWorkerDto, UpdateWorkerDto, Worker};
use tracing::instrument;

use crate::middleware::auth::RequireStaffOrReadOnly;
use crate::modules::workers::service::WorkerService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_workers(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Worker>>, AppError> {
    Ok(Json(WorkerService::get_workers(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_worker(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateWorkerDto>,
) -> Result<(StatusCode, Json<Worker>), AppError> {
    let worker = WorkerService::create_worker(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(worker)))
}

#[instrument(skip(state))]
pub async fn get_worker(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<WorkerId>,
) -> Result<Json<Worker>, AppError> {
    Ok(Json(WorkerService::get_worker(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_worker(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<WorkerId>,
    ValidatedJson(dto): ValidatedJson<UpdateWorkerDto>,
) -> Result<Json<Worker>, AppError> {
    Ok(Json(WorkerService::update_worker(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_worker(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<WorkerId>,
) -> Result<StatusCode, AppError> {
    WorkerService::delete_worker(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

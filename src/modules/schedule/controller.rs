use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::schedule::{
    CreateTableDto, CreateTitledDto, Room, Table, TableType, UpdateTableDto, UpdateTitledDto,
};
use campusdesk_models::{RoomId, TableId, TableTypeId};
use tracing::instrument;

use crate::middleware::auth::RequireStaffOrReadOnly;
use crate::modules::schedule::service::ScheduleService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_rooms(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Room>>, AppError> {
    Ok(Json(ScheduleService::get_rooms(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_room(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateTitledDto>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let created = ScheduleService::create_room(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<RoomId>,
) -> Result<Json<Room>, AppError> {
    Ok(Json(ScheduleService::get_room(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_room(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<RoomId>,
    ValidatedJson(dto): ValidatedJson<UpdateTitledDto>,
) -> Result<Json<Room>, AppError> {
    Ok(Json(ScheduleService::update_room(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_room(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<RoomId>,
) -> Result<StatusCode, AppError> {
    ScheduleService::delete_room(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_table_types(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<TableType>>, AppError> {
    Ok(Json(ScheduleService::get_table_types(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_table_type(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateTitledDto>,
) -> Result<(StatusCode, Json<TableType>), AppError> {
    let created = ScheduleService::create_table_type(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_table_type(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TableTypeId>,
) -> Result<Json<TableType>, AppError> {
    Ok(Json(ScheduleService::get_table_type(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_table_type(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TableTypeId>,
    ValidatedJson(dto): ValidatedJson<UpdateTitledDto>,
) -> Result<Json<TableType>, AppError> {
    Ok(Json(ScheduleService::update_table_type(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_table_type(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TableTypeId>,
) -> Result<StatusCode, AppError> {
    ScheduleService::delete_table_type(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_tables(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Table>>, AppError> {
    Ok(Json(ScheduleService::get_tables(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_table(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateTableDto>,
) -> Result<(StatusCode, Json<Table>), AppError> {
    let created = ScheduleService::create_table(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_table(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TableId>,
) -> Result<Json<Table>, AppError> {
    Ok(Json(ScheduleService::get_table(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_table(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TableId>,
    ValidatedJson(dto): ValidatedJson<UpdateTableDto>,
) -> Result<Json<Table>, AppError> {
    Ok(Json(ScheduleService::update_table(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_table(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TableId>,
) -> Result<StatusCode, AppError> {
    ScheduleService::delete_table(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

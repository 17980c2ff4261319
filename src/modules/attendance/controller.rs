use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::attendance::{
    Attendance, AttendanceLevel, CreateAttendanceDto, CreateAttendanceLevelDto, CreateStatusDto,
    Status, UpdateAttendanceDto, UpdateAttendanceLevelDto, UpdateStatusDto,
};
use campusdesk_models::{AttendanceId, AttendanceLevelId, StatusId};
use tracing::instrument;

use crate::middleware::auth::{RequireAdmin, RequireAuthenticated, RequireStaffOrReadOnly};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_levels(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<AttendanceLevel>>, AppError> {
    Ok(Json(AttendanceService::get_levels(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_level(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceLevelDto>,
) -> Result<(StatusCode, Json<AttendanceLevel>), AppError> {
    let level = AttendanceService::create_level(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(level)))
}

#[instrument(skip(state))]
pub async fn get_level(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<AttendanceLevelId>,
) -> Result<Json<AttendanceLevel>, AppError> {
    Ok(Json(AttendanceService::get_level(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_level(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<AttendanceLevelId>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceLevelDto>,
) -> Result<Json<AttendanceLevel>, AppError> {
    Ok(Json(AttendanceService::update_level(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_level(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<AttendanceLevelId>,
) -> Result<StatusCode, AppError> {
    AttendanceService::delete_level(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_statuses(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Status>>, AppError> {
    Ok(Json(AttendanceService::get_statuses(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_status(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStatusDto>,
) -> Result<(StatusCode, Json<Status>), AppError> {
    let status = AttendanceService::create_status(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

#[instrument(skip(state))]
pub async fn get_status(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<StatusId>,
) -> Result<Json<Status>, AppError> {
    Ok(Json(AttendanceService::get_status(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<StatusId>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusDto>,
) -> Result<Json<Status>, AppError> {
    Ok(Json(AttendanceService::update_status(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_status(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<StatusId>,
) -> Result<StatusCode, AppError> {
    AttendanceService::delete_status(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_attendances(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Attendance>>, AppError> {
    Ok(Json(AttendanceService::get_attendances(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_attendance(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let record = AttendanceService::create_attendance(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
pub async fn get_attendance(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<AttendanceId>,
) -> Result<Json<Attendance>, AppError> {
    Ok(Json(AttendanceService::get_attendance(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_attendance(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<AttendanceId>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<Attendance>, AppError> {
    Ok(Json(
        AttendanceService::update_attendance(&state.db, id, dto).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<AttendanceId>,
) -> Result<StatusCode, AppError> {
    AttendanceService::delete_attendance(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

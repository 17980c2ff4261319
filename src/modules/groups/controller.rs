use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::GroupId;
use campusdesk_models::groups::{
    CreateGroupDto, DetailResponse, Group, GroupStudentDto, GroupTeacherDto, UpdateGroupDto,
};
use tracing::instrument;

use crate::middleware::auth::RequireStaffOrReadOnly;
use crate::modules::groups::service::GroupService;
use crate::state::AppState;
use crate::validator::{JsonBody, ValidatedJson};

#[instrument(skip(state))]
pub async fn get_groups(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Group>>, AppError> {
    Ok(Json(GroupService::get_groups(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_group(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateGroupDto>,
) -> Result<(StatusCode, Json<Group>), AppError> {
    let group = GroupService::create_group(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[instrument(skip(state))]
pub async fn get_group(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<GroupId>,
) -> Result<Json<Group>, AppError> {
    Ok(Json(GroupService::get_group(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_group(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<GroupId>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupDto>,
) -> Result<Json<Group>, AppError> {
    Ok(Json(GroupService::update_group(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<GroupId>,
) -> Result<StatusCode, AppError> {
    GroupService::delete_group(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn add_student(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<GroupId>,
    JsonBody(dto): JsonBody<GroupStudentDto>,
) -> Result<Json<DetailResponse>, AppError> {
    Ok(Json(GroupService::add_student(&state.db, id, dto.student_id).await?))
}

#[instrument(skip(state))]
pub async fn remove_student(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<GroupId>,
    JsonBody(dto): JsonBody<GroupStudentDto>,
) -> Result<Json<DetailResponse>, AppError> {
    Ok(Json(
        GroupService::remove_student(&state.db, id, dto.student_id).await?,
    ))
}

#[instrument(skip(state))]
pub async fn add_teacher(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<GroupId>,
    JsonBody(dto): JsonBody<GroupTeacherDto>,
) -> Result<Json<DetailResponse>, AppError> {
    Ok(Json(GroupService::add_teacher(&state.db, id, dto.teacher_id).await?))
}

#[instrument(skip(state))]
pub async fn remove_teacher(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<GroupId>,
    JsonBody(dto): JsonBody<GroupTeacherDto>,
) -> Result<Json<DetailResponse>, AppError> {
    Ok(Json(
        GroupService::remove_teacher(&state.db, id, dto.teacher_id).await?,
    ))
}

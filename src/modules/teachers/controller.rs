use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::TeacherId;
use campusdesk_models::groups::Group;
use campusdesk_models::staff::{
    CreateTeacherDto, Teacher, TeachersByIdsDto, TeachersByIdsResponse, UpdateTeacherDto,
};
use tracing::instrument;

use crate::middleware::auth::{RequireAdmin, RequireAdminOrOwner};
use crate::modules::groups::service::GroupService;
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Teacher>>, AppError> {
    Ok(Json(TeacherService::get_teachers(&state.db, params).await?))
}

/// `{user: {...}, teacher: {...}}` in one transaction.
#[instrument(skip(state, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = TeacherService::create_teacher(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[instrument(skip(state))]
pub async fn get_teachers_by_ids(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<TeachersByIdsDto>,
) -> Result<Json<TeachersByIdsResponse>, AppError> {
    Ok(Json(
        TeacherService::get_teachers_by_ids(&state.db, &dto.teacher_ids).await?,
    ))
}

#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    RequireAdminOrOwner(guard): RequireAdminOrOwner,
    Path(id): Path<TeacherId>,
) -> Result<Json<Teacher>, AppError> {
    let owner = TeacherService::owner_of(&state.db, id).await?;
    guard.check_object(Some(owner.get()))?;
    Ok(Json(TeacherService::get_teacher(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn get_teacher_groups(
    State(state): State<AppState>,
    RequireAdminOrOwner(guard): RequireAdminOrOwner,
    Path(id): Path<TeacherId>,
) -> Result<Json<Vec<Group>>, AppError> {
    let owner = TeacherService::owner_of(&state.db, id).await?;
    guard.check_object(Some(owner.get()))?;
    Ok(Json(GroupService::get_groups_for_teacher(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_teacher(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<TeacherId>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(TeacherService::update_teacher(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<TeacherId>,
) -> Result<StatusCode, AppError> {
    TeacherService::delete_teacher(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

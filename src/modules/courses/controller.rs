use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::courses::{
    Course, CreateCourseDto, CreateDepartmentDto, Department, UpdateCourseDto,
    UpdateDepartmentDto,
};
use campusdesk_models::{CourseId, DepartmentId};
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Department>>, AppError> {
    Ok(Json(CourseService::get_departments(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = CourseService::create_department(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<DepartmentId>,
) -> Result<Json<Department>, AppError> {
    Ok(Json(CourseService::get_department(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<DepartmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    Ok(Json(
        CourseService::update_department(&state.db, id, dto).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<DepartmentId>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_department(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Course>>, AppError> {
    Ok(Json(CourseService::get_courses(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<CourseId>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(CourseService::get_course(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(CourseService::update_course(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

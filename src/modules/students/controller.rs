use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::StudentId;
use campusdesk_models::attendance::Attendance;
use campusdesk_models::groups::Group;
use campusdesk_models::students::{
    CreateStudentDto, RegisterStudentDto, Student, StudentFilterParams, StudentStatistics,
    StudentStatisticsDto, UpdateStudentDto,
};
use tracing::instrument;

use crate::middleware::auth::{
    RequireAdmin, RequireAuthenticated, RequireStaff, RequireStaffOrReadOnly,
};
use crate::modules::groups::service::GroupService;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<Paginated<Student>>, AppError> {
    Ok(Json(StudentService::get_students(&state.db, filters).await?))
}

#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// `{user: {...}, student: {...}}` in one transaction.
#[instrument(skip(state, dto))]
pub async fn register_student(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<RegisterStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::register_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<StudentId>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(StudentService::get_student(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(StudentService::update_student(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<StudentId>,
) -> Result<StatusCode, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_student_attendances(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<StudentId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Attendance>>, AppError> {
    Ok(Json(
        StudentService::get_attendances(&state.db, id, params).await?,
    ))
}

#[instrument(skip(state))]
pub async fn get_student_groups(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<StudentId>,
) -> Result<Json<Vec<Group>>, AppError> {
    StudentService::owner_of(&state.db, id).await?;
    Ok(Json(GroupService::get_groups_for_student(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn get_statistics(
    State(state): State<AppState>,
    _guard: RequireStaff,
    ValidatedJson(dto): ValidatedJson<StudentStatisticsDto>,
) -> Result<Json<StudentStatistics>, AppError> {
    Ok(Json(StudentService::get_statistics(&state.db, dto).await?))
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated};
use campusdesk_models::UserId;
use campusdesk_models::users::{
    CreateSuperuserDto, CreateUserDto, SuperuserCreated, UpdateUserDto, User, UserFilterParams,
};
use tracing::instrument;

use crate::middleware::auth::{RequireAdmin, RequireStaff, RequireStaffOrSelf};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<Paginated<User>>, AppError> {
    let users = UserService::get_users(&state.db, filters).await?;
    Ok(Json(users))
}

#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Users may edit their own account; only staff may touch role or active status.
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireStaffOrSelf(guard): RequireStaffOrSelf,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    guard.check_object(Some(id.get()))?;

    if dto.changes_privileges() && !guard.is_staff() {
        return Err(AppError::forbidden(
            "Only staff can change role or active status",
        ));
    }

    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, dto))]
pub async fn create_superuser(
    State(state): State<AppState>,
    _guard: RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateSuperuserDto>,
) -> Result<(StatusCode, Json<SuperuserCreated>), AppError> {
    let created = UserService::create_superuser(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

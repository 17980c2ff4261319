use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::homework::{
    CreateGroupHomeWorkDto, CreateHomeWorkDto, CreateTopicDto, GroupHomeWork, HomeWork, Topic,
    UpdateGroupHomeWorkDto, UpdateHomeWorkDto, UpdateTopicDto,
};
use campusdesk_models::{GroupHomeWorkId, HomeWorkId, TopicId};
use tracing::instrument;

use crate::middleware::auth::{
    RequireAuthenticated, RequireAuthenticatedAdminOrOwner, RequireStaffOrReadOnly,
};
use crate::modules::homework::service::HomeworkService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_topics(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Topic>>, AppError> {
    Ok(Json(HomeworkService::get_topics(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_topic(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    ValidatedJson(dto): ValidatedJson<CreateTopicDto>,
) -> Result<(StatusCode, Json<Topic>), AppError> {
    let topic = HomeworkService::create_topic(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(topic)))
}

#[instrument(skip(state))]
pub async fn get_topic(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TopicId>,
) -> Result<Json<Topic>, AppError> {
    Ok(Json(HomeworkService::get_topic(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_topic(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TopicId>,
    ValidatedJson(dto): ValidatedJson<UpdateTopicDto>,
) -> Result<Json<Topic>, AppError> {
    Ok(Json(HomeworkService::update_topic(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_topic(
    State(state): State<AppState>,
    _guard: RequireStaffOrReadOnly,
    Path(id): Path<TopicId>,
) -> Result<StatusCode, AppError> {
    HomeworkService::delete_topic(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_group_homeworks(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<GroupHomeWork>>, AppError> {
    Ok(Json(HomeworkService::get_group_homeworks(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_group_homework(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    ValidatedJson(dto): ValidatedJson<CreateGroupHomeWorkDto>,
) -> Result<(StatusCode, Json<GroupHomeWork>), AppError> {
    let homework = HomeworkService::create_group_homework(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(homework)))
}

#[instrument(skip(state))]
pub async fn get_group_homework(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<GroupHomeWorkId>,
) -> Result<Json<GroupHomeWork>, AppError> {
    Ok(Json(HomeworkService::get_group_homework(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_group_homework(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<GroupHomeWorkId>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupHomeWorkDto>,
) -> Result<Json<GroupHomeWork>, AppError> {
    Ok(Json(
        HomeworkService::update_group_homework(&state.db, id, dto).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_group_homework(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<GroupHomeWorkId>,
) -> Result<StatusCode, AppError> {
    HomeworkService::delete_group_homework(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_submissions(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<HomeWork>>, AppError> {
    Ok(Json(HomeworkService::get_submissions(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_submission(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    ValidatedJson(dto): ValidatedJson<CreateHomeWorkDto>,
) -> Result<(StatusCode, Json<HomeWork>), AppError> {
    let homework = HomeworkService::create_submission(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(homework)))
}

#[instrument(skip(state))]
pub async fn get_submission(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    Path(id): Path<HomeWorkId>,
) -> Result<Json<HomeWork>, AppError> {
    Ok(Json(HomeworkService::get_submission(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_submission(
    State(state): State<AppState>,
    RequireAuthenticatedAdminOrOwner(guard): RequireAuthenticatedAdminOrOwner,
    Path(id): Path<HomeWorkId>,
    ValidatedJson(dto): ValidatedJson<UpdateHomeWorkDto>,
) -> Result<Json<HomeWork>, AppError> {
    let owner = HomeworkService::submission_owner(&state.db, id).await?;
    guard.check_object(Some(owner.get()))?;
    Ok(Json(HomeworkService::update_submission(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_submission(
    State(state): State<AppState>,
    RequireAuthenticatedAdminOrOwner(guard): RequireAuthenticatedAdminOrOwner,
    Path(id): Path<HomeWorkId>,
) -> Result<StatusCode, AppError> {
    let owner = HomeworkService::submission_owner(&state.db, id).await?;
    guard.check_object(Some(owner.get()))?;
    HomeworkService::delete_submission(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_models::payments::{
    CreatePaymentDto, Month, Payment, PaymentType, TitleDto, UpdatePaymentDto, UpdateTitleDto,
};
use campusdesk_models::{MonthId, PaymentId, PaymentTypeId};
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::payments::service::PaymentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_months(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Month>>, AppError> {
    Ok(Json(PaymentService::get_months(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_month(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<TitleDto>,
) -> Result<(StatusCode, Json<Month>), AppError> {
    let created = PaymentService::create_month(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_month(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<MonthId>,
) -> Result<Json<Month>, AppError> {
    Ok(Json(PaymentService::get_month(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_month(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<MonthId>,
    ValidatedJson(dto): ValidatedJson<UpdateTitleDto>,
) -> Result<Json<Month>, AppError> {
    Ok(Json(PaymentService::update_month(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_month(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<MonthId>,
) -> Result<StatusCode, AppError> {
    PaymentService::delete_month(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_payment_types(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<PaymentType>>, AppError> {
    Ok(Json(PaymentService::get_payment_types(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_payment_type(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<TitleDto>,
) -> Result<(StatusCode, Json<PaymentType>), AppError> {
    let created = PaymentService::create_payment_type(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_payment_type(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<PaymentTypeId>,
) -> Result<Json<PaymentType>, AppError> {
    Ok(Json(PaymentService::get_payment_type(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_payment_type(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<PaymentTypeId>,
    ValidatedJson(dto): ValidatedJson<UpdateTitleDto>,
) -> Result<Json<PaymentType>, AppError> {
    Ok(Json(PaymentService::update_payment_type(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_payment_type(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<PaymentTypeId>,
) -> Result<StatusCode, AppError> {
    PaymentService::delete_payment_type(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_payments(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Payment>>, AppError> {
    Ok(Json(PaymentService::get_payments(&state.db, params).await?))
}

#[instrument(skip(state))]
pub async fn create_payment(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let created = PaymentService::create_payment(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<PaymentId>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(PaymentService::get_payment(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn update_payment(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<PaymentId>,
    ValidatedJson(dto): ValidatedJson<UpdatePaymentDto>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(PaymentService::update_payment(&state.db, id, dto).await?))
}

#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<PaymentId>,
) -> Result<StatusCode, AppError> {
    PaymentService::delete_payment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{Json, extract::State};
use campusdesk_core::AppError;
use campusdesk_models::auth::{
    AccessTokenResponse, ChangePasswordDto, EmptyResponse, LoginRequest, LoginResponse,
    MeResponse, MessageResponse, RefreshRequest, ResetPasswordDto, SetNewPasswordDto,
    StatusResponse, TokenPair, VerifyOtpDto, VerifyTokenRequest,
};
use tracing::instrument;

use crate::middleware::auth::{RequireAllowAny, RequireAuthenticated};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// `POST /token`: same credential check as login, answers with the pair only.
#[instrument(skip_all)]
pub async fn obtain_token_pair(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(TokenPair {
        access: response.access,
        refresh: response.refresh,
    }))
}

#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let response = AuthService::refresh(&state.db, &state.jwt_config, &dto.refresh).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn verify_token(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<VerifyTokenRequest>,
) -> Result<Json<EmptyResponse>, AppError> {
    AuthService::verify_token(&state.db, &state.jwt_config, &dto.token).await?;
    Ok(Json(EmptyResponse {}))
}

#[instrument(skip_all)]
pub async fn blacklist_token(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<EmptyResponse>, AppError> {
    let response = AuthService::blacklist(&state.db, &state.jwt_config, &dto.refresh).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn logout_user(
    State(state): State<AppState>,
    _guard: RequireAuthenticated,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let response = AuthService::logout(&state.db, &state.jwt_config, &dto.refresh).await?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    RequireAuthenticated(guard): RequireAuthenticated,
) -> Result<Json<MeResponse>, AppError> {
    let response = AuthService::me(&state.db, guard.principal()?).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuthenticated(guard): RequireAuthenticated,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AuthService::change_password(&state.db, guard.principal()?, dto).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<ResetPasswordDto>,
) -> Result<Json<StatusResponse>, AppError> {
    let response = AuthService::request_reset(&state.db, dto).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn verify_otp(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<VerifyOtpDto>,
) -> Result<Json<StatusResponse>, AppError> {
    let response = AuthService::verify_otp(&state.db, dto).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn set_new_password(
    State(state): State<AppState>,
    _guard: RequireAllowAny,
    ValidatedJson(dto): ValidatedJson<SetNewPasswordDto>,
) -> Result<Json<StatusResponse>, AppError> {
    let response = AuthService::set_new_password(&state.db, dto).await?;
    Ok(Json(response))
}

use anyhow::anyhow;
use campusdesk_auth::otp::{generate_otp, otp_matches};
use campusdesk_auth::{
    Principal, RefreshTokenClaims, Role, TokenClaims, TokenError, create_access_token,
    create_refresh_token, decode_access_token, decode_any_token, decode_refresh_token,
};
use campusdesk_config::JwtConfig;
use campusdesk_core::{AppError, hash_password, verify_password};
use campusdesk_models::auth::{
    AccessTokenResponse, ChangePasswordDto, EmptyResponse, LoginRequest, LoginResponse,
    MeResponse, MessageResponse, ResetPasswordDto, SetNewPasswordDto, StatusResponse, TokenPair,
    VerifyOtpDto,
};
use campusdesk_models::users::UserCredentials;
use campusdesk_models::{StudentId, TeacherId, UserId, WorkerId};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{info, instrument, warn};

use crate::metrics::{
    track_jwt_blacklisted, track_jwt_issued, track_otp_issued, track_user_login_failure,
    track_user_login_success,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials";
const INVALID_OTP: &str = "OTP code is invalid";

pub struct AuthService;

impl AuthService {
    /// Resolves a bearer access token to the caller. The role and active
    /// flag come from storage, not from the token.
    #[instrument(skip_all)]
    pub async fn resolve_principal(state: &AppState, token: &str) -> Result<Principal, AppError> {
        let claims = TokenClaims::from(decode_access_token(token, &state.jwt_config)?);
        Self::ensure_not_revoked(&state.db, &claims).await?;
        Self::load_principal(&state.db, claims.user_id).await
    }

    #[instrument(skip(db, jwt_config, dto), fields(phone = %dto.phone))]
    pub async fn login(
        db: &SqlitePool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, role, is_active, password, otp_code FROM users WHERE phone = ?",
        )
        .bind(&dto.phone)
        .fetch_optional(db)
        .await?;

        let Some(credentials) = credentials else {
            track_user_login_failure("unknown_phone");
            return Err(invalid_credentials());
        };

        if !credentials.is_active {
            track_user_login_failure("inactive");
            return Err(invalid_credentials());
        }

        if !verify_password(&dto.password, &credentials.password)? {
            track_user_login_failure("wrong_password");
            return Err(invalid_credentials());
        }

        let tokens = Self::issue_token_pair(credentials.id, credentials.role, jwt_config)?;
        let user = UserService::get_user(db, credentials.id).await?;

        track_user_login_success(credentials.role.as_str());
        info!(user_id = %credentials.id, "user logged in");

        Ok(LoginResponse {
            access: tokens.access,
            refresh: tokens.refresh,
            user,
        })
    }

    /// A fresh refresh token and an access token of its lineage.
    pub fn issue_token_pair(
        user_id: UserId,
        role: Role,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AppError> {
        let refresh = create_refresh_token(user_id.get(), jwt_config)?;
        let access = create_access_token(user_id.get(), role, &refresh.claims.jti, jwt_config)?;

        track_jwt_issued("refresh");
        track_jwt_issued("access");

        Ok(TokenPair {
            access: access.token,
            refresh: refresh.token,
        })
    }

    #[instrument(skip_all)]
    pub async fn refresh(
        db: &SqlitePool,
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<AccessTokenResponse, AppError> {
        let claims = decode_refresh_token(token, jwt_config)?;
        Self::ensure_not_revoked(db, &TokenClaims::from(claims.clone())).await?;

        let principal = Self::load_principal(db, claims.user_id).await?;
        let access = create_access_token(principal.user_id, principal.role, &claims.jti, jwt_config)?;
        track_jwt_issued("access");

        Ok(AccessTokenResponse {
            access: access.token,
        })
    }

    /// Accepts either token kind.
    #[instrument(skip_all)]
    pub async fn verify_token(
        db: &SqlitePool,
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<Principal, AppError> {
        let claims = decode_any_token(token, jwt_config)?;
        Self::ensure_not_revoked(db, &claims).await?;
        Self::load_principal(db, claims.user_id).await
    }

    #[instrument(skip_all)]
    pub async fn blacklist(
        db: &SqlitePool,
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<EmptyResponse, AppError> {
        Self::revoke(db, jwt_config, token).await??;
        Ok(EmptyResponse {})
    }

    /// Blacklists the refresh token; any token failure is a 400 here.
    #[instrument(skip_all)]
    pub async fn logout(
        db: &SqlitePool,
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<StatusResponse, AppError> {
        match Self::revoke(db, jwt_config, token).await? {
            Ok(claims) => {
                info!(user_id = claims.user_id, "user logged out");
                Ok(StatusResponse::ok("Logged out successfully"))
            }
            Err(err) => Err(AppError::bad_request(anyhow!(err)).with_status_flag()),
        }
    }

    #[instrument(skip(db))]
    pub async fn me(db: &SqlitePool, principal: Principal) -> Result<MeResponse, AppError> {
        let user = UserService::get_user(db, UserId(principal.user_id)).await?;

        let (student_id, teacher_id, worker_id) = sqlx::query_as::<
            _,
            (Option<StudentId>, Option<TeacherId>, Option<WorkerId>),
        >(
            "SELECT (SELECT id FROM students WHERE user_id = ?),
                    (SELECT id FROM teachers WHERE user_id = ?),
                    (SELECT id FROM workers WHERE user_id = ?)",
        )
        .bind(principal.user_id)
        .bind(principal.user_id)
        .bind(principal.user_id)
        .fetch_one(db)
        .await?;

        Ok(MeResponse {
            user,
            student_id,
            teacher_id,
            worker_id,
        })
    }

    /// Outstanding tokens stay valid after the change.
    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &SqlitePool,
        principal: Principal,
        dto: ChangePasswordDto,
    ) -> Result<MessageResponse, AppError> {
        let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE id = ?")
            .bind(principal.user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(&dto.old_password, &stored)? {
            return Err(
                AppError::bad_request(anyhow!("Old password is incorrect"))
                    .with_code("validation_error"),
            );
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
            .bind(&new_hash)
            .bind(Utc::now())
            .bind(principal.user_id)
            .execute(db)
            .await?;

        info!(user_id = principal.user_id, "password changed");
        Ok(MessageResponse {
            message: "Password changed successfully".to_string(),
        })
    }

    /// Issues a new code, replacing any previous one.
    #[instrument(skip(db, dto), fields(phone = %dto.phone))]
    pub async fn request_reset(
        db: &SqlitePool,
        dto: ResetPasswordDto,
    ) -> Result<StatusResponse, AppError> {
        let code = generate_otp();

        let result = sqlx::query("UPDATE users SET otp_code = ?, updated_at = ? WHERE phone = ?")
            .bind(&code)
            .bind(Utc::now())
            .bind(&dto.phone)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(
                "User with this phone number does not exist"
            )));
        }

        deliver_otp(&dto.phone, &code);
        track_otp_issued();

        Ok(StatusResponse::ok("OTP code sent"))
    }

    #[instrument(skip(db, dto), fields(phone = %dto.phone))]
    pub async fn verify_otp(db: &SqlitePool, dto: VerifyOtpDto) -> Result<StatusResponse, AppError> {
        let stored = Self::stored_otp(db, &dto.phone).await?;
        if !otp_matches(stored.as_deref(), &dto.otp) {
            return Err(AppError::bad_request(anyhow!(INVALID_OTP)).with_status_flag());
        }
        Ok(StatusResponse::ok("OTP code verified"))
    }

    /// Consumes the code: it is cleared together with the password change.
    #[instrument(skip(db, dto), fields(phone = %dto.phone))]
    pub async fn set_new_password(
        db: &SqlitePool,
        dto: SetNewPasswordDto,
    ) -> Result<StatusResponse, AppError> {
        let stored = Self::stored_otp(db, &dto.phone).await?;
        if !otp_matches(stored.as_deref(), &dto.otp) {
            return Err(AppError::bad_request(anyhow!(INVALID_OTP)).with_status_flag());
        }

        let new_hash = hash_password(&dto.new_password)?;
        let result = sqlx::query(
            "UPDATE users SET password = ?, otp_code = NULL, updated_at = ?
             WHERE phone = ? AND otp_code = ?",
        )
        .bind(&new_hash)
        .bind(Utc::now())
        .bind(&dto.phone)
        .bind(&dto.otp)
        .execute(db)
        .await?;

        // Another request consumed the code in between.
        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow!(INVALID_OTP)).with_status_flag());
        }

        info!("password reset with otp");
        Ok(StatusResponse::ok("Password has been reset"))
    }

    async fn stored_otp(db: &SqlitePool, phone: &str) -> Result<Option<String>, AppError> {
        let stored: Option<Option<String>> =
            sqlx::query_scalar("SELECT otp_code FROM users WHERE phone = ?")
                .bind(phone)
                .fetch_optional(db)
                .await?;
        Ok(stored.flatten())
    }

    /// Outer error: storage failure. Inner error: the token itself is unusable.
    async fn revoke(
        db: &SqlitePool,
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<Result<RefreshTokenClaims, TokenError>, AppError> {
        let claims = match decode_refresh_token(token, jwt_config) {
            Ok(claims) => claims,
            Err(err) => return Ok(Err(err)),
        };

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);

        let result = sqlx::query(
            "INSERT INTO blacklisted_tokens (jti, user_id, expires_at, blacklisted_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(&claims.jti)
        .bind(claims.user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(db)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(Err(TokenError::Revoked)),
            Ok(_) => {
                track_jwt_blacklisted();
                info!(user_id = claims.user_id, jti = %claims.jti, "refresh token blacklisted");
                Ok(Ok(claims))
            }
            // The owning user is gone.
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Ok(Err(TokenError::Invalid))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn ensure_not_revoked(db: &SqlitePool, claims: &TokenClaims) -> Result<(), AppError> {
        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM blacklisted_tokens WHERE jti IN (");
        let mut ids = query.separated(", ");
        for jti in claims.revocation_ids() {
            ids.push_bind(jti.to_string());
        }
        ids.push_unseparated(")");

        let hits: i64 = query.build_query_scalar().fetch_one(db).await?;
        if hits > 0 {
            return Err(TokenError::Revoked.into());
        }
        Ok(())
    }

    async fn load_principal(db: &SqlitePool, user_id: i64) -> Result<Principal, AppError> {
        let row: Option<(Role, bool)> =
            sqlx::query_as("SELECT role, is_active FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(db)
                .await?;

        match row {
            Some((role, true)) => Ok(Principal {
                user_id,
                role,
                is_active: true,
            }),
            Some((_, false)) => {
                warn!(user_id, "token presented for inactive user");
                Err(AppError::unauthorized("User is inactive").with_code("user_inactive"))
            }
            None => Err(AppError::unauthorized("User not found").with_code("user_not_found")),
        }
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(INVALID_CREDENTIALS)
        .with_code("no_active_account")
        .with_status_flag()
}

/// Delivery hook for reset codes. There is no SMS gateway; the code is
/// emitted as a structured event for whatever consumes the logs.
fn deliver_otp(phone: &str, code: &str) {
    info!(target: "campusdesk::otp", phone, code, "otp issued");
}

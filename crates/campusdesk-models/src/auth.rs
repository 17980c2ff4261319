//! Request and response bodies for `/auth` and `/token`.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ids::{StudentId, TeacherId, WorkerId};
use crate::users::User;
use crate::value_types::validate_phone;

/// Phone is not format-checked here: an unknown phone is a failed login,
/// not a validation error.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

/// The empty `{}` body `/token/verify` and `/token/blacklist` answer with.
#[derive(Serialize, Debug, Clone, Default)]
pub struct EmptyResponse {}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct ResetPasswordDto {
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct VerifyOtpDto {
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1, max = 6))]
    pub otp: String,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct SetNewPasswordDto {
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1, max = 6))]
    pub otp: String,
    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: bool,
    pub detail: String,
}

impl StatusResponse {
    pub fn ok(detail: impl Into<String>) -> Self {
        Self {
            status: true,
            detail: detail.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// The caller's account plus the profiles attached to it.
#[derive(Serialize, Debug, Clone)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub student_id: Option<StudentId>,
    pub teacher_id: Option<TeacherId>,
    pub worker_id: Option<WorkerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_requires_both_fields() {
        let ok = LoginRequest {
            phone: "+998901234567".into(),
            password: "Secret123".into(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginRequest {
            phone: String::new(),
            password: String::new(),
        };
        let errors = empty.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_otp_is_at_most_six_chars() {
        let dto = VerifyOtpDto {
            phone: "+998901234567".into(),
            otp: "1234567".into(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_new_password_length() {
        let dto = ChangePasswordDto {
            old_password: "Secret123".into(),
            new_password: "short".into(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_status_response_shape() {
        let json = serde_json::to_value(StatusResponse::ok("sent")).unwrap();
        assert_eq!(json, serde_json::json!({"status": true, "detail": "sent"}));
    }

    #[test]
    fn test_empty_response_is_empty_object() {
        assert_eq!(serde_json::to_string(&EmptyResponse {}).unwrap(), "{}");
    }
}

//! User accounts.
//!
//! A user is identified by phone number. Students, teachers and workers are
//! profiles hanging off a user row.

use campusdesk_auth::Role;
use campusdesk_core::PaginationParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::UserId;
use crate::value_types::{Phone, validate_phone};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub phone: Phone,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The columns login and OTP checks need. Never serialized.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub role: Role,
    pub is_active: bool,
    pub password: String,
    pub otp_code: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDto {
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(max = 50))]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Absent fields keep their current value.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateUserDto {
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    #[validate(length(max = 50))]
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUserDto {
    /// Whether the update touches fields only staff may change.
    pub fn changes_privileges(&self) -> bool {
        self.role.is_some() || self.is_active.is_some()
    }
}

/// The `user` half of a combined user + profile create. The role is implied
/// by the profile being created.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct NewUserDto {
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(max = 50))]
    pub full_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateSuperuserDto {
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(max = 50))]
    pub full_name: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct SuperuserCreated {
    pub message: String,
    pub user_id: UserId,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserFilterParams {
    pub role: Option<Role>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

fn default_true() -> bool {
    true
}

//! Student profiles, enrollment and registration statistics.

use campusdesk_core::PaginationParams;
use campusdesk_core::serde::deserialize_optional_i64;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::ids::{CourseId, GroupId, StudentId, UserId};
use crate::users::NewUserDto;
use crate::value_types::Phone;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub user_id: UserId,
    pub phone: Phone,
    pub full_name: Option<String>,
    pub group_id: Option<GroupId>,
    pub is_line: bool,
    pub is_active: bool,
    pub descriptions: Option<String>,
    #[sqlx(skip)]
    pub course_ids: Vec<CourseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateStudentDto {
    pub user_id: UserId,
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
    #[serde(default)]
    pub is_line: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

/// The `student` half of `/students/register`.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct StudentProfileDto {
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
    #[serde(default)]
    pub is_line: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

impl Default for StudentProfileDto {
    fn default() -> Self {
        Self {
            group_id: None,
            course_ids: Vec::new(),
            is_line: false,
            is_active: true,
            descriptions: None,
        }
    }
}

/// `{ "user": {...}, "student": {...} }`: both rows are created together or
/// not at all.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct RegisterStudentDto {
    #[validate(nested)]
    pub user: NewUserDto,
    #[serde(default)]
    #[validate(nested)]
    pub student: StudentProfileDto,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateStudentDto {
    pub group_id: Option<GroupId>,
    pub course_ids: Option<Vec<CourseId>>,
    pub is_line: Option<bool>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub group_id: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Inclusive date range over the students' registration date.
#[derive(Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct StudentStatisticsDto {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_date_range(dto: &StudentStatisticsDto) -> Result<(), ValidationError> {
    if dto.start_date > dto.end_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("start_date must not be after end_date".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudentStatistics {
    pub total_students: i64,
    pub registered_students: i64,
    pub studying_students: i64,
    pub graduated_students: i64,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_payload_defaults_student_half() {
        let dto: RegisterStudentDto = serde_json::from_str(
            r#"{"user":{"phone":"+998901234567","password":"Secret123","full_name":"Ali"}}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.student.is_active);
        assert!(!dto.student.is_line);
        assert_eq!(dto.student.group_id, None);
    }

    #[test]
    fn test_register_payload_validates_student_half() {
        let dto: RegisterStudentDto = serde_json::from_str(&format!(
            r#"{{"user":{{"phone":"+998901234567","password":"Secret123"}},
                "student":{{"descriptions":"{}"}}}}"#,
            "d".repeat(501)
        ))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("student"));
    }

    #[test]
    fn test_statistics_range_must_be_ordered() {
        let ok = StudentStatisticsDto {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        assert!(ok.validate().is_ok());

        let reversed = StudentStatisticsDto {
            start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn test_statistics_dates_parse_iso() {
        let dto: StudentStatisticsDto =
            serde_json::from_str(r#"{"start_date":"2025-01-01","end_date":"2025-12-31"}"#).unwrap();
        assert_eq!(dto.end_date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}

//! Study groups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{CourseId, GroupId, StudentId, TeacherId};
use crate::value_types::Price;

/// A cohort of students taking one course. `end_date` is not checked
/// against `start_date`.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub course_id: CourseId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Option<Price>,
    pub descriptions: Option<String>,
    #[sqlx(skip)]
    pub teacher_ids: Vec<TeacherId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateGroupDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    pub course_id: CourseId,
    #[serde(default)]
    pub teacher_ids: Vec<TeacherId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Option<Price>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateGroupDto {
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    pub course_id: Option<CourseId>,
    pub teacher_ids: Option<Vec<TeacherId>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub price: Option<Price>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct GroupStudentDto {
    pub student_id: StudentId,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct GroupTeacherDto {
    pub teacher_id: TeacherId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_group_payload() {
        let dto: CreateGroupDto = serde_json::from_str(
            r#"{"title":"G-1","course_id":3,"start_date":"2025-09-01",
                "end_date":"2026-06-01","price":"1500.00"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.price.map(Price::cents), Some(150_000));
        assert!(dto.teacher_ids.is_empty());
    }

    #[test]
    fn test_end_before_start_is_accepted() {
        let dto: CreateGroupDto = serde_json::from_str(
            r#"{"title":"G-2","course_id":3,"start_date":"2025-09-01","end_date":"2025-01-01"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_price_with_three_decimals_is_rejected() {
        let result: Result<CreateGroupDto, _> = serde_json::from_str(
            r#"{"title":"G-3","course_id":3,"start_date":"2025-09-01",
                "end_date":"2026-06-01","price":"10.125"}"#,
        );
        assert!(result.is_err());
    }
}

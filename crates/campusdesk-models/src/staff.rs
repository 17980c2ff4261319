//! Teachers and workers: staff profiles attached to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{CourseId, DepartmentId, TeacherId, UserId, WorkerId};
use crate::users::NewUserDto;
use crate::value_types::Phone;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub id: WorkerId,
    pub user_id: UserId,
    pub phone: Phone,
    pub full_name: Option<String>,
    pub descriptions: Option<String>,
    #[sqlx(skip)]
    pub department_ids: Vec<DepartmentId>,
    #[sqlx(skip)]
    pub course_ids: Vec<CourseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateWorkerDto {
    pub user_id: UserId,
    #[serde(default)]
    pub department_ids: Vec<DepartmentId>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

/// A present id list replaces the stored one; an absent list is untouched.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateWorkerDto {
    pub department_ids: Option<Vec<DepartmentId>>,
    pub course_ids: Option<Vec<CourseId>>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub id: TeacherId,
    pub user_id: UserId,
    pub phone: Phone,
    pub full_name: Option<String>,
    pub description: Option<String>,
    #[sqlx(skip)]
    pub department_ids: Vec<DepartmentId>,
    #[sqlx(skip)]
    pub course_ids: Vec<CourseId>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct TeacherProfileDto {
    pub description: Option<String>,
    #[serde(default)]
    pub department_ids: Vec<DepartmentId>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
}

/// `{ "user": {...}, "teacher": {...} }`: both rows are created together or
/// not at all.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateTeacherDto {
    #[validate(nested)]
    pub user: NewUserDto,
    #[serde(default)]
    #[validate(nested)]
    pub teacher: TeacherProfileDto,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateTeacherDto {
    pub description: Option<String>,
    pub department_ids: Option<Vec<DepartmentId>>,
    pub course_ids: Option<Vec<CourseId>>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct TeachersByIdsDto {
    #[validate(length(min = 1, message = "teacher_ids must be a non-empty list"))]
    pub teacher_ids: Vec<TeacherId>,
}

#[derive(Serialize, Debug, Clone)]
pub struct TeachersByIdsResponse {
    pub teachers: Vec<Teacher>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_teacher_payload() {
        let dto: CreateTeacherDto = serde_json::from_str(
            r#"{"user":{"phone":"+998901112233","password":"Secret123"},
                "teacher":{"description":"Math","course_ids":[1,2]}}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.teacher.course_ids, vec![CourseId(1), CourseId(2)]);
        assert!(dto.teacher.department_ids.is_empty());
    }

    #[test]
    fn test_combined_teacher_payload_validates_nested_user() {
        let dto: CreateTeacherDto =
            serde_json::from_str(r#"{"user":{"phone":"bad","password":"1"}}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("user"));
    }

    #[test]
    fn test_by_ids_requires_ids() {
        let dto = TeachersByIdsDto {
            teacher_ids: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_worker_update_distinguishes_absent_lists() {
        let dto: UpdateWorkerDto = serde_json::from_str(r#"{"course_ids":[]}"#).unwrap();
        assert_eq!(dto.course_ids, Some(vec![]));
        assert_eq!(dto.department_ids, None);
    }
}

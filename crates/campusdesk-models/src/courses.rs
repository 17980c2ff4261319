//! Departments and courses.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{CourseId, DepartmentId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: DepartmentId,
    pub title: String,
    pub is_active: bool,
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_defaults_to_active() {
        let dto: CreateDepartmentDto = serde_json::from_str(r#"{"title":"Languages"}"#).unwrap();
        assert!(dto.is_active);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_title_limits() {
        let dto = CreateCourseDto {
            title: "x".repeat(51),
            descriptions: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateCourseDto {
            title: String::new(),
            descriptions: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_descriptions_limit() {
        let dto = UpdateCourseDto {
            title: None,
            descriptions: Some("d".repeat(501)),
        };
        assert!(dto.validate().is_err());
        assert!(UpdateCourseDto::default().validate().is_ok());
    }
}

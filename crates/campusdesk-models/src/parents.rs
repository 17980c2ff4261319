//! Parents and guardians. Not users: they never log in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{ParentId, StudentId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub id: ParentId,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub address: String,
    pub description: Option<String>,
    #[sqlx(skip)]
    pub student_ids: Vec<StudentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateParentDto {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 50))]
    pub address: String,
    pub description: Option<String>,
    #[serde(default)]
    pub student_ids: Vec<StudentId>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateParentDto {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub address: Option<String>,
    pub description: Option<String>,
    pub student_ids: Option<Vec<StudentId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_parent_validation() {
        let dto: CreateParentDto = serde_json::from_str(
            r#"{"name":"Aziza","surname":"Karimova","phone":"+998901112233",
                "address":"Tashkent","student_ids":[4]}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.student_ids, vec![StudentId(4)]);

        let dto = CreateParentDto {
            phone: "1".repeat(21),
            ..dto
        };
        assert!(dto.validate().is_err());
    }
}

//! Attendance records and the lookup tables they point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{AttendanceId, AttendanceLevelId, GroupId, StatusId, StudentId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct AttendanceLevel {
    pub id: AttendanceLevelId,
    pub title: String,
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateAttendanceLevelDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateAttendanceLevelDto {
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub id: StatusId,
    pub title: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateStatusDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateStatusDto {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Level, group and student are restrict-delete references; deleting the
/// status removes the attendance.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub id: AttendanceId,
    pub level_id: AttendanceLevelId,
    pub student_id: StudentId,
    pub status_id: StatusId,
    pub group_id: GroupId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateAttendanceDto {
    pub level_id: AttendanceLevelId,
    pub student_id: StudentId,
    pub status_id: StatusId,
    pub group_id: GroupId,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateAttendanceDto {
    pub level_id: Option<AttendanceLevelId>,
    pub student_id: Option<StudentId>,
    pub status_id: Option<StatusId>,
    pub group_id: Option<GroupId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_attendance_requires_all_references() {
        let missing: Result<CreateAttendanceDto, _> =
            serde_json::from_str(r#"{"level_id":1,"student_id":2,"status_id":3}"#);
        assert!(missing.is_err());

        let dto: CreateAttendanceDto =
            serde_json::from_str(r#"{"level_id":1,"student_id":2,"status_id":3,"group_id":4}"#)
                .unwrap();
        assert_eq!(dto.group_id, GroupId(4));
    }

    #[test]
    fn test_status_limits() {
        let dto = CreateStatusDto {
            title: "Present".into(),
            name: "n".repeat(101),
            description: None,
        };
        assert!(dto.validate().is_err());
    }
}

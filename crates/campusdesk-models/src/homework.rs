//! Topics, homework assigned to groups, and student submissions.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{CourseId, GroupHomeWorkId, GroupId, HomeWorkId, StudentId, TopicId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub course_id: CourseId,
    pub is_active: bool,
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateTopicDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    pub course_id: CourseId,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateTopicDto {
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    pub course_id: Option<CourseId>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

/// Homework set for a whole group on one topic.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct GroupHomeWork {
    pub id: GroupHomeWorkId,
    pub group_id: GroupId,
    pub topic_id: TopicId,
    pub is_active: bool,
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateGroupHomeWorkDto {
    pub group_id: GroupId,
    pub topic_id: TopicId,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateGroupHomeWorkDto {
    pub group_id: Option<GroupId>,
    pub topic_id: Option<TopicId>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

/// One student's submission: a link to the work. Unreviewed until
/// `is_active` is set.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct HomeWork {
    pub id: HomeWorkId,
    pub group_homework_id: GroupHomeWorkId,
    pub student_id: StudentId,
    pub link: String,
    pub is_active: bool,
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateHomeWorkDto {
    pub group_homework_id: GroupHomeWorkId,
    pub student_id: StudentId,
    #[validate(url)]
    pub link: String,
    #[serde(default)]
    pub is_active: bool,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateHomeWorkDto {
    pub group_homework_id: Option<GroupHomeWorkId>,
    pub student_id: Option<StudentId>,
    #[validate(url)]
    pub link: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500))]
    pub descriptions: Option<String>,
}

fn default_true() -> bool {
    true
}

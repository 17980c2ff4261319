//! Free-text comments left by users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{CommentId, UserId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The author is always the caller.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateCommentDto {
    #[validate(length(min = 1, max = 5000))]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_text_required() {
        assert!(CreateCommentDto { text: String::new() }.validate().is_err());
        assert!(CreateCommentDto { text: "Great lesson".into() }.validate().is_ok());
    }

    #[test]
    fn test_author_is_not_client_writable() {
        let dto: CreateCommentDto =
            serde_json::from_str(r#"{"text":"hi","user_id":99}"#).unwrap();
        assert_eq!(dto.text, "hi");
    }
}

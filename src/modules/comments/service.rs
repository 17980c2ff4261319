use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_models::comments::{Comment, CreateCommentDto, UpdateCommentDto};
use campusdesk_models::{CommentId, UserId};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

pub struct CommentService;

impl CommentService {
    #[instrument(skip(db, dto))]
    pub async fn create_comment(
        db: &SqlitePool,
        author: UserId,
        dto: CreateCommentDto,
    ) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (user_id, text, created_at) VALUES (?, ?, ?)
             RETURNING id, user_id, text, created_at",
        )
        .bind(author)
        .bind(&dto.text)
        .bind(Utc::now())
        .fetch_one(db)
        .await
        .on_write("Comment")
    }

    #[instrument(skip(db))]
    pub async fn get_comments(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Comment>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(db)
            .await?;
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, text, created_at FROM comments ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(comments, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_comment(db: &SqlitePool, id: CommentId) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, text, created_at FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Comment not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_comment(
        db: &SqlitePool,
        id: CommentId,
        dto: UpdateCommentDto,
    ) -> Result<Comment, AppError> {
        let existing = Self::get_comment(db, id).await?;
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET text = ? WHERE id = ?
             RETURNING id, user_id, text, created_at",
        )
        .bind(dto.text.unwrap_or(existing.text))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Comment")
    }

    #[instrument(skip(db))]
    pub async fn delete_comment(db: &SqlitePool, id: CommentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Comment")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Comment not found")));
        }
        Ok(())
    }
}

//! Topics, group homework and student submissions.

use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_models::homework::{
    CreateGroupHomeWorkDto, CreateHomeWorkDto, CreateTopicDto, GroupHomeWork, HomeWork, Topic,
    UpdateGroupHomeWorkDto, UpdateHomeWorkDto, UpdateTopicDto,
};
use campusdesk_models::{GroupHomeWorkId, HomeWorkId, TopicId, UserId};
use sqlx::SqlitePool;
use tracing::instrument;

const TOPIC_COLUMNS: &str = "id, title, course_id, is_active, descriptions";
const GROUP_HOMEWORK_COLUMNS: &str = "id, group_id, topic_id, is_active, descriptions";
const HOMEWORK_COLUMNS: &str = "id, group_homework_id, student_id, link, is_active, descriptions";

pub struct HomeworkService;

impl HomeworkService {
    #[instrument(skip(db))]
    pub async fn create_topic(db: &SqlitePool, dto: CreateTopicDto) -> Result<Topic, AppError> {
        sqlx::query_as::<_, Topic>(&format!(
            "INSERT INTO topics (title, course_id, is_active, descriptions) VALUES (?, ?, ?, ?)
             RETURNING {TOPIC_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(dto.course_id)
        .bind(dto.is_active)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Topic")
    }

    #[instrument(skip(db))]
    pub async fn get_topics(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Topic>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
            .fetch_one(db)
            .await?;
        let topics = sqlx::query_as::<_, Topic>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(topics, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_topic(db: &SqlitePool, id: TopicId) -> Result<Topic, AppError> {
        sqlx::query_as::<_, Topic>(&format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Topic not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_topic(
        db: &SqlitePool,
        id: TopicId,
        dto: UpdateTopicDto,
    ) -> Result<Topic, AppError> {
        let existing = Self::get_topic(db, id).await?;
        sqlx::query_as::<_, Topic>(&format!(
            "UPDATE topics SET title = ?, course_id = ?, is_active = ?, descriptions = ?
             WHERE id = ?
             RETURNING {TOPIC_COLUMNS}"
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.course_id.unwrap_or(existing.course_id))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Topic")
    }

    #[instrument(skip(db))]
    pub async fn delete_topic(db: &SqlitePool, id: TopicId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM topics WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Topic")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Topic not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_group_homework(
        db: &SqlitePool,
        dto: CreateGroupHomeWorkDto,
    ) -> Result<GroupHomeWork, AppError> {
        sqlx::query_as::<_, GroupHomeWork>(&format!(
            "INSERT INTO group_homeworks (group_id, topic_id, is_active, descriptions)
             VALUES (?, ?, ?, ?)
             RETURNING {GROUP_HOMEWORK_COLUMNS}"
        ))
        .bind(dto.group_id)
        .bind(dto.topic_id)
        .bind(dto.is_active)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Group homework")
    }

    #[instrument(skip(db))]
    pub async fn get_group_homeworks(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<GroupHomeWork>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM group_homeworks")
            .fetch_one(db)
            .await?;
        let homeworks = sqlx::query_as::<_, GroupHomeWork>(&format!(
            "SELECT {GROUP_HOMEWORK_COLUMNS} FROM group_homeworks ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(homeworks, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_group_homework(
        db: &SqlitePool,
        id: GroupHomeWorkId,
    ) -> Result<GroupHomeWork, AppError> {
        sqlx::query_as::<_, GroupHomeWork>(&format!(
            "SELECT {GROUP_HOMEWORK_COLUMNS} FROM group_homeworks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Group homework not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_group_homework(
        db: &SqlitePool,
        id: GroupHomeWorkId,
        dto: UpdateGroupHomeWorkDto,
    ) -> Result<GroupHomeWork, AppError> {
        let existing = Self::get_group_homework(db, id).await?;
        sqlx::query_as::<_, GroupHomeWork>(&format!(
            "UPDATE group_homeworks SET group_id = ?, topic_id = ?, is_active = ?, descriptions = ?
             WHERE id = ?
             RETURNING {GROUP_HOMEWORK_COLUMNS}"
        ))
        .bind(dto.group_id.unwrap_or(existing.group_id))
        .bind(dto.topic_id.unwrap_or(existing.topic_id))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Group homework")
    }

    #[instrument(skip(db))]
    pub async fn delete_group_homework(
        db: &SqlitePool,
        id: GroupHomeWorkId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM group_homeworks WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Group homework")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Group homework not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_submission(
        db: &SqlitePool,
        dto: CreateHomeWorkDto,
    ) -> Result<HomeWork, AppError> {
        sqlx::query_as::<_, HomeWork>(&format!(
            "INSERT INTO homeworks (group_homework_id, student_id, link, is_active, descriptions)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {HOMEWORK_COLUMNS}"
        ))
        .bind(dto.group_homework_id)
        .bind(dto.student_id)
        .bind(&dto.link)
        .bind(dto.is_active)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Homework")
    }

    #[instrument(skip(db))]
    pub async fn get_submissions(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<HomeWork>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM homeworks")
            .fetch_one(db)
            .await?;
        let homeworks = sqlx::query_as::<_, HomeWork>(&format!(
            "SELECT {HOMEWORK_COLUMNS} FROM homeworks ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(homeworks, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_submission(db: &SqlitePool, id: HomeWorkId) -> Result<HomeWork, AppError> {
        sqlx::query_as::<_, HomeWork>(&format!(
            "SELECT {HOMEWORK_COLUMNS} FROM homeworks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Homework not found")))
    }

    /// The user behind the submitting student.
    #[instrument(skip(db))]
    pub async fn submission_owner(db: &SqlitePool, id: HomeWorkId) -> Result<UserId, AppError> {
        sqlx::query_scalar(
            "SELECT s.user_id FROM homeworks h JOIN students s ON s.id = h.student_id
             WHERE h.id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Homework not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_submission(
        db: &SqlitePool,
        id: HomeWorkId,
        dto: UpdateHomeWorkDto,
    ) -> Result<HomeWork, AppError> {
        let existing = Self::get_submission(db, id).await?;
        sqlx::query_as::<_, HomeWork>(&format!(
            "UPDATE homeworks
             SET group_homework_id = ?, student_id = ?, link = ?, is_active = ?, descriptions = ?
             WHERE id = ?
             RETURNING {HOMEWORK_COLUMNS}"
        ))
        .bind(dto.group_homework_id.unwrap_or(existing.group_homework_id))
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(dto.link.unwrap_or(existing.link))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Homework")
    }

    #[instrument(skip(db))]
    pub async fn delete_submission(db: &SqlitePool, id: HomeWorkId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM homeworks WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Homework")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Homework not found")));
        }
        Ok(())
    }
}

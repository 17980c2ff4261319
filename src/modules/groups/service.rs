use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_db::relations::GROUP_TEACHERS;
use campusdesk_models::groups::{CreateGroupDto, DetailResponse, Group, UpdateGroupDto};
use campusdesk_models::{GroupId, StudentId, TeacherId};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};

pub const GROUP_COLUMNS: &str =
    "id, title, course_id, start_date, end_date, price, descriptions, created_at, updated_at";

pub struct GroupService;

impl GroupService {
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_group(db: &SqlitePool, dto: CreateGroupDto) -> Result<Group, AppError> {
        let now = Utc::now();
        let mut tx = db.begin().await?;

        let id: GroupId = sqlx::query_scalar(
            "INSERT INTO study_groups
                (title, course_id, start_date, end_date, price, descriptions, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&dto.title)
        .bind(dto.course_id)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.price)
        .bind(&dto.descriptions)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .on_write("Group")?;

        GROUP_TEACHERS
            .replace(&mut tx, id.get(), &dto.teacher_ids)
            .await
            .on_write("Group")?;

        tx.commit().await?;

        info!(group_id = %id, "group created");
        Self::get_group(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_groups(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Group>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM study_groups")
            .fetch_one(db)
            .await?;

        let mut groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Self::attach_teachers(db, &mut groups).await?;
        Ok(Paginated::new(groups, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_group(db: &SqlitePool, id: GroupId) -> Result<Group, AppError> {
        let mut group = sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Group not found")))?;

        group.teacher_ids = GROUP_TEACHERS.load(db, id.get()).await?;
        Ok(group)
    }

    /// Groups a teacher is linked to.
    #[instrument(skip(db))]
    pub async fn get_groups_for_teacher(
        db: &SqlitePool,
        teacher_id: TeacherId,
    ) -> Result<Vec<Group>, AppError> {
        let mut groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups
             WHERE id IN (SELECT group_id FROM group_teachers WHERE teacher_id = ?)
             ORDER BY id"
        ))
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        Self::attach_teachers(db, &mut groups).await?;
        Ok(groups)
    }

    /// The group a student belongs to, as a list of at most one.
    #[instrument(skip(db))]
    pub async fn get_groups_for_student(
        db: &SqlitePool,
        student_id: StudentId,
    ) -> Result<Vec<Group>, AppError> {
        let mut groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups
             WHERE id = (SELECT group_id FROM students WHERE id = ?)"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Self::attach_teachers(db, &mut groups).await?;
        Ok(groups)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_group(
        db: &SqlitePool,
        id: GroupId,
        dto: UpdateGroupDto,
    ) -> Result<Group, AppError> {
        let existing = Self::get_group(db, id).await?;
        let mut tx = db.begin().await?;

        sqlx::query(
            "UPDATE study_groups
             SET title = ?, course_id = ?, start_date = ?, end_date = ?, price = ?,
                 descriptions = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.course_id.unwrap_or(existing.course_id))
        .bind(dto.start_date.unwrap_or(existing.start_date))
        .bind(dto.end_date.unwrap_or(existing.end_date))
        .bind(dto.price.or(existing.price))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await
        .on_write("Group")?;

        if let Some(teacher_ids) = dto.teacher_ids {
            GROUP_TEACHERS
                .replace(&mut tx, id.get(), &teacher_ids)
                .await
                .on_write("Group")?;
        }

        tx.commit().await?;
        Self::get_group(db, id).await
    }

    /// Students of the group keep their rows with `group_id` cleared.
    #[instrument(skip(db))]
    pub async fn delete_group(db: &SqlitePool, id: GroupId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM study_groups WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Group")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Group not found")));
        }
        Ok(())
    }

    /// Moves the student into this group.
    #[instrument(skip(db))]
    pub async fn add_student(
        db: &SqlitePool,
        id: GroupId,
        student_id: StudentId,
    ) -> Result<DetailResponse, AppError> {
        Self::ensure_exists(db, id).await?;

        let result =
            sqlx::query("UPDATE students SET group_id = ?, updated_at = ? WHERE id = ?")
                .bind(id)
                .bind(Utc::now())
                .bind(student_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }
        Ok(DetailResponse::new("Student added successfully"))
    }

    /// No-op when the student is in another group or in none.
    #[instrument(skip(db))]
    pub async fn remove_student(
        db: &SqlitePool,
        id: GroupId,
        student_id: StudentId,
    ) -> Result<DetailResponse, AppError> {
        Self::ensure_exists(db, id).await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = ?)")
            .bind(student_id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        sqlx::query(
            "UPDATE students SET group_id = NULL, updated_at = ? WHERE id = ? AND group_id = ?",
        )
        .bind(Utc::now())
        .bind(student_id)
        .bind(id)
        .execute(db)
        .await?;

        Ok(DetailResponse::new("Student removed successfully"))
    }

    #[instrument(skip(db))]
    pub async fn add_teacher(
        db: &SqlitePool,
        id: GroupId,
        teacher_id: TeacherId,
    ) -> Result<DetailResponse, AppError> {
        Self::ensure_exists(db, id).await?;
        Self::ensure_teacher_exists(db, teacher_id).await?;

        let mut conn = db.acquire().await?;
        GROUP_TEACHERS
            .insert(&mut conn, id.get(), &[teacher_id])
            .await
            .on_write("Group")?;

        Ok(DetailResponse::new("Teacher added successfully"))
    }

    #[instrument(skip(db))]
    pub async fn remove_teacher(
        db: &SqlitePool,
        id: GroupId,
        teacher_id: TeacherId,
    ) -> Result<DetailResponse, AppError> {
        Self::ensure_exists(db, id).await?;
        Self::ensure_teacher_exists(db, teacher_id).await?;

        GROUP_TEACHERS.remove(db, id.get(), teacher_id.get()).await?;
        Ok(DetailResponse::new("Teacher removed successfully"))
    }

    pub async fn attach_teachers(db: &SqlitePool, groups: &mut [Group]) -> Result<(), AppError> {
        let ids: Vec<i64> = groups.iter().map(|g| g.id.get()).collect();
        let mut links = GROUP_TEACHERS.load_many::<TeacherId>(db, &ids).await?;
        for group in groups {
            group.teacher_ids = links.remove(&group.id.get()).unwrap_or_default();
        }
        Ok(())
    }

    async fn ensure_exists(db: &SqlitePool, id: GroupId) -> Result<(), AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM study_groups WHERE id = ?)")
                .bind(id)
                .fetch_one(db)
                .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Group not found")));
        }
        Ok(())
    }

    async fn ensure_teacher_exists(db: &SqlitePool, id: TeacherId) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = ?)")
            .bind(id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }
        Ok(())
    }
}

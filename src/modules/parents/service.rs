use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_db::relations::PARENT_STUDENTS;
use campusdesk_models::ParentId;
use campusdesk_models::parents::{CreateParentDto, Parent, UpdateParentDto};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

const PARENT_COLUMNS: &str = "id, name, surname, phone, address, description, created_at, updated_at";

pub struct ParentService;

impl ParentService {
    #[instrument(skip(db))]
    pub async fn create_parent(db: &SqlitePool, dto: CreateParentDto) -> Result<Parent, AppError> {
        let now = Utc::now();
        let mut tx = db.begin().await?;

        let mut parent = sqlx::query_as::<_, Parent>(&format!(
            "INSERT INTO parents (name, surname, phone, address, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {PARENT_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.surname)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.description)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .on_write("Parent")?;

        PARENT_STUDENTS
            .replace(&mut tx, parent.id.get(), &dto.student_ids)
            .await
            .on_write("Parent")?;
        parent.student_ids = PARENT_STUDENTS.load(&mut *tx, parent.id.get()).await?;

        tx.commit().await?;
        Ok(parent)
    }

    #[instrument(skip(db))]
    pub async fn get_parents(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Parent>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parents")
            .fetch_one(db)
            .await?;
        let mut parents = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {PARENT_COLUMNS} FROM parents ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        let ids: Vec<i64> = parents.iter().map(|p| p.id.get()).collect();
        let mut links = PARENT_STUDENTS.load_many(db, &ids).await?;
        for parent in &mut parents {
            parent.student_ids = links.remove(&parent.id.get()).unwrap_or_default();
        }

        Ok(Paginated::new(parents, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_parent(db: &SqlitePool, id: ParentId) -> Result<Parent, AppError> {
        let mut parent = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {PARENT_COLUMNS} FROM parents WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Parent not found")))?;

        parent.student_ids = PARENT_STUDENTS.load(db, id.get()).await?;
        Ok(parent)
    }

    #[instrument(skip(db))]
    pub async fn update_parent(
        db: &SqlitePool,
        id: ParentId,
        dto: UpdateParentDto,
    ) -> Result<Parent, AppError> {
        let existing = Self::get_parent(db, id).await?;
        let mut tx = db.begin().await?;

        sqlx::query(
            "UPDATE parents
             SET name = ?, surname = ?, phone = ?, address = ?, description = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.surname.unwrap_or(existing.surname))
        .bind(dto.phone.unwrap_or(existing.phone))
        .bind(dto.address.unwrap_or(existing.address))
        .bind(dto.description.or(existing.description))
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await
        .on_write("Parent")?;

        if let Some(student_ids) = dto.student_ids {
            PARENT_STUDENTS
                .replace(&mut tx, id.get(), &student_ids)
                .await
                .on_write("Parent")?;
        }

        tx.commit().await?;
        Self::get_parent(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_parent(db: &SqlitePool, id: ParentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM parents WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Parent")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Parent not found")));
        }
        Ok(())
    }
}

use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_db::relations::{WORKER_COURSES, WORKER_DEPARTMENTS};
use campusdesk_models::staff::{CreateWorkerDto, UpdateWorkerDto, Worker};
use campusdesk_models::{CourseId, DepartmentId, WorkerId};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

const WORKER_SELECT: &str = "SELECT w.id, w.user_id, u.phone, u.full_name, w.descriptions,
        w.created_at, w.updated_at
     FROM workers w
     JOIN users u ON u.id = w.user_id";

pub struct WorkerService;

impl WorkerService {
    #[instrument(skip(db))]
    pub async fn create_worker(db: &SqlitePool, dto: CreateWorkerDto) -> Result<Worker, AppError> {
        let now = Utc::now();
        let mut tx = db.begin().await?;

        let id: WorkerId = sqlx::query_scalar(
            "INSERT INTO workers (user_id, descriptions, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(dto.user_id)
        .bind(&dto.descriptions)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .on_write("Worker")?;

        WORKER_DEPARTMENTS
            .replace(&mut tx, id.get(), &dto.department_ids)
            .await
            .on_write("Worker")?;
        WORKER_COURSES
            .replace(&mut tx, id.get(), &dto.course_ids)
            .await
            .on_write("Worker")?;

        tx.commit().await?;
        Self::get_worker(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_workers(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Worker>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workers")
            .fetch_one(db)
            .await?;

        let mut workers = sqlx::query_as::<_, Worker>(&format!(
            "{WORKER_SELECT} ORDER BY w.id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        let ids: Vec<i64> = workers.iter().map(|w| w.id.get()).collect();
        let mut departments = WORKER_DEPARTMENTS.load_many::<DepartmentId>(db, &ids).await?;
        let mut courses = WORKER_COURSES.load_many::<CourseId>(db, &ids).await?;
        for worker in &mut workers {
            let key = worker.id.get();
            worker.department_ids = departments.remove(&key).unwrap_or_default();
            worker.course_ids = courses.remove(&key).unwrap_or_default();
        }

        Ok(Paginated::new(workers, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_worker(db: &SqlitePool, id: WorkerId) -> Result<Worker, AppError> {
        let mut worker = sqlx::query_as::<_, Worker>(&format!("{WORKER_SELECT} WHERE w.id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Worker not found")))?;

        worker.department_ids = WORKER_DEPARTMENTS.load(db, id.get()).await?;
        worker.course_ids = WORKER_COURSES.load(db, id.get()).await?;
        Ok(worker)
    }

    #[instrument(skip(db))]
    pub async fn update_worker(
        db: &SqlitePool,
        id: WorkerId,
        dto: UpdateWorkerDto,
    ) -> Result<Worker, AppError> {
        let existing = Self::get_worker(db, id).await?;
        let mut tx = db.begin().await?;

        sqlx::query("UPDATE workers SET descriptions = ?, updated_at = ? WHERE id = ?")
            .bind(dto.descriptions.or(existing.descriptions))
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await
            .on_write("Worker")?;

        if let Some(department_ids) = dto.department_ids {
            WORKER_DEPARTMENTS
                .replace(&mut tx, id.get(), &department_ids)
                .await
                .on_write("Worker")?;
        }
        if let Some(course_ids) = dto.course_ids {
            WORKER_COURSES
                .replace(&mut tx, id.get(), &course_ids)
                .await
                .on_write("Worker")?;
        }

        tx.commit().await?;
        Self::get_worker(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_worker(db: &SqlitePool, id: WorkerId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM workers WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Worker")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Worker not found")));
        }
        Ok(())
    }
}

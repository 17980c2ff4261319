use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_models::attendance::{
    Attendance, AttendanceLevel, CreateAttendanceDto, CreateAttendanceLevelDto, CreateStatusDto,
    Status, UpdateAttendanceDto, UpdateAttendanceLevelDto, UpdateStatusDto,
};
use campusdesk_models::{AttendanceId, AttendanceLevelId, StatusId};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

pub const ATTENDANCE_COLUMNS: &str =
    "id, level_id, student_id, status_id, group_id, created_at, updated_at";

pub struct AttendanceService;

impl AttendanceService {
    // Levels

    #[instrument(skip(db))]
    pub async fn create_level(
        db: &SqlitePool,
        dto: CreateAttendanceLevelDto,
    ) -> Result<AttendanceLevel, AppError> {
        sqlx::query_as::<_, AttendanceLevel>(
            "INSERT INTO attendance_levels (title, descriptions) VALUES (?, ?)
             RETURNING id, title, descriptions",
        )
        .bind(&dto.title)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Attendance level")
    }

    #[instrument(skip(db))]
    pub async fn get_levels(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<AttendanceLevel>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance_levels")
            .fetch_one(db)
            .await?;
        let levels = sqlx::query_as::<_, AttendanceLevel>(
            "SELECT id, title, descriptions FROM attendance_levels ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(levels, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_level(
        db: &SqlitePool,
        id: AttendanceLevelId,
    ) -> Result<AttendanceLevel, AppError> {
        sqlx::query_as::<_, AttendanceLevel>(
            "SELECT id, title, descriptions FROM attendance_levels WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Attendance level not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_level(
        db: &SqlitePool,
        id: AttendanceLevelId,
        dto: UpdateAttendanceLevelDto,
    ) -> Result<AttendanceLevel, AppError> {
        let existing = Self::get_level(db, id).await?;
        sqlx::query_as::<_, AttendanceLevel>(
            "UPDATE attendance_levels SET title = ?, descriptions = ? WHERE id = ?
             RETURNING id, title, descriptions",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Attendance level")
    }

    /// 409 while attendance rows use the level.
    #[instrument(skip(db))]
    pub async fn delete_level(db: &SqlitePool, id: AttendanceLevelId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendance_levels WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Attendance level")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Attendance level not found")));
        }
        Ok(())
    }

    // Statuses

    #[instrument(skip(db))]
    pub async fn create_status(db: &SqlitePool, dto: CreateStatusDto) -> Result<Status, AppError> {
        sqlx::query_as::<_, Status>(
            "INSERT INTO statuses (title, name, description) VALUES (?, ?, ?)
             RETURNING id, title, name, description",
        )
        .bind(&dto.title)
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .on_write("Status")
    }

    #[instrument(skip(db))]
    pub async fn get_statuses(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Status>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM statuses")
            .fetch_one(db)
            .await?;
        let statuses = sqlx::query_as::<_, Status>(
            "SELECT id, title, name, description FROM statuses ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(statuses, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_status(db: &SqlitePool, id: StatusId) -> Result<Status, AppError> {
        sqlx::query_as::<_, Status>("SELECT id, title, name, description FROM statuses WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Status not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_status(
        db: &SqlitePool,
        id: StatusId,
        dto: UpdateStatusDto,
    ) -> Result<Status, AppError> {
        let existing = Self::get_status(db, id).await?;
        sqlx::query_as::<_, Status>(
            "UPDATE statuses SET title = ?, name = ?, description = ? WHERE id = ?
             RETURNING id, title, name, description",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.description.or(existing.description))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Status")
    }

    /// Attendance rows with this status go with it.
    #[instrument(skip(db))]
    pub async fn delete_status(db: &SqlitePool, id: StatusId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Status")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Status not found")));
        }
        Ok(())
    }

    // Attendance records

    #[instrument(skip(db))]
    pub async fn create_attendance(
        db: &SqlitePool,
        dto: CreateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Attendance>(&format!(
            "INSERT INTO attendances (level_id, student_id, status_id, group_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {ATTENDANCE_COLUMNS}"
        ))
        .bind(dto.level_id)
        .bind(dto.student_id)
        .bind(dto.status_id)
        .bind(dto.group_id)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await
        .on_write("Attendance")
    }

    #[instrument(skip(db))]
    pub async fn get_attendances(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Attendance>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendances")
            .fetch_one(db)
            .await?;
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(records, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_attendance(db: &SqlitePool, id: AttendanceId) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Attendance not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_attendance(
        db: &SqlitePool,
        id: AttendanceId,
        dto: UpdateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let existing = Self::get_attendance(db, id).await?;
        sqlx::query_as::<_, Attendance>(&format!(
            "UPDATE attendances
             SET level_id = ?, student_id = ?, status_id = ?, group_id = ?, updated_at = ?
             WHERE id = ?
             RETURNING {ATTENDANCE_COLUMNS}"
        ))
        .bind(dto.level_id.unwrap_or(existing.level_id))
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(dto.status_id.unwrap_or(existing.status_id))
        .bind(dto.group_id.unwrap_or(existing.group_id))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Attendance")
    }

    #[instrument(skip(db))]
    pub async fn delete_attendance(db: &SqlitePool, id: AttendanceId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendances WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Attendance")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Attendance not found")));
        }
        Ok(())
    }
}

use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_models::schedule::{
    CreateTableDto, CreateTitledDto, Room, Table, TableType, UpdateTableDto, UpdateTitledDto,
};
use campusdesk_models::{RoomId, TableId, TableTypeId};
use sqlx::SqlitePool;
use tracing::instrument;

const TABLE_COLUMNS: &str = "id, start_time, end_time, room_id, table_type_id, descriptions";

pub struct ScheduleService;

impl ScheduleService {
    #[instrument(skip(db))]
    pub async fn create_room(db: &SqlitePool, dto: CreateTitledDto) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (title, descriptions) VALUES (?, ?)
             RETURNING id, title, descriptions",
        )
        .bind(&dto.title)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Room")
    }

    #[instrument(skip(db))]
    pub async fn get_rooms(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Room>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
            .fetch_one(db)
            .await?;
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT id, title, descriptions FROM rooms ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(rooms, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_room(db: &SqlitePool, id: RoomId) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>("SELECT id, title, descriptions FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Room not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_room(
        db: &SqlitePool,
        id: RoomId,
        dto: UpdateTitledDto,
    ) -> Result<Room, AppError> {
        let existing = Self::get_room(db, id).await?;
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET title = ?, descriptions = ? WHERE id = ?
             RETURNING id, title, descriptions",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Room")
    }

    #[instrument(skip(db))]
    pub async fn delete_room(db: &SqlitePool, id: RoomId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Room")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Room not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_table_type(
        db: &SqlitePool,
        dto: CreateTitledDto,
    ) -> Result<TableType, AppError> {
        sqlx::query_as::<_, TableType>(
            "INSERT INTO table_types (title, descriptions) VALUES (?, ?)
             RETURNING id, title, descriptions",
        )
        .bind(&dto.title)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Table type")
    }

    #[instrument(skip(db))]
    pub async fn get_table_types(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<TableType>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM table_types")
            .fetch_one(db)
            .await?;
        let types = sqlx::query_as::<_, TableType>(
            "SELECT id, title, descriptions FROM table_types ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(types, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_table_type(db: &SqlitePool, id: TableTypeId) -> Result<TableType, AppError> {
        sqlx::query_as::<_, TableType>(
            "SELECT id, title, descriptions FROM table_types WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Table type not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_table_type(
        db: &SqlitePool,
        id: TableTypeId,
        dto: UpdateTitledDto,
    ) -> Result<TableType, AppError> {
        let existing = Self::get_table_type(db, id).await?;
        sqlx::query_as::<_, TableType>(
            "UPDATE table_types SET title = ?, descriptions = ? WHERE id = ?
             RETURNING id, title, descriptions",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Table type")
    }

    #[instrument(skip(db))]
    pub async fn delete_table_type(db: &SqlitePool, id: TableTypeId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM table_types WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Table type")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Table type not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_table(db: &SqlitePool, dto: CreateTableDto) -> Result<Table, AppError> {
        sqlx::query_as::<_, Table>(&format!(
            "INSERT INTO timetable_slots (start_time, end_time, room_id, table_type_id, descriptions)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {TABLE_COLUMNS}"
        ))
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.room_id)
        .bind(dto.table_type_id)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Table")
    }

    #[instrument(skip(db))]
    pub async fn get_tables(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Table>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM timetable_slots")
            .fetch_one(db)
            .await?;
        let tables = sqlx::query_as::<_, Table>(&format!(
            "SELECT {TABLE_COLUMNS} FROM timetable_slots ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(tables, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_table(db: &SqlitePool, id: TableId) -> Result<Table, AppError> {
        sqlx::query_as::<_, Table>(&format!(
            "SELECT {TABLE_COLUMNS} FROM timetable_slots WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Table not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_table(
        db: &SqlitePool,
        id: TableId,
        dto: UpdateTableDto,
    ) -> Result<Table, AppError> {
        let existing = Self::get_table(db, id).await?;
        sqlx::query_as::<_, Table>(&format!(
            "UPDATE timetable_slots
             SET start_time = ?, end_time = ?, room_id = ?, table_type_id = ?, descriptions = ?
             WHERE id = ?
             RETURNING {TABLE_COLUMNS}"
        ))
        .bind(dto.start_time.unwrap_or(existing.start_time))
        .bind(dto.end_time.unwrap_or(existing.end_time))
        .bind(dto.room_id.unwrap_or(existing.room_id))
        .bind(dto.table_type_id.unwrap_or(existing.table_type_id))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Table")
    }

    #[instrument(skip(db))]
    pub async fn delete_table(db: &SqlitePool, id: TableId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM timetable_slots WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Table")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Table not found")));
        }
        Ok(())
    }
}

use anyhow::anyhow;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_models::courses::{
    Course, CreateCourseDto, CreateDepartmentDto, Department, UpdateCourseDto,
    UpdateDepartmentDto,
};
use campusdesk_models::{CourseId, DepartmentId};
use sqlx::SqlitePool;
use tracing::instrument;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn create_department(
        db: &SqlitePool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (title, is_active, descriptions) VALUES (?, ?, ?)
             RETURNING id, title, is_active, descriptions",
        )
        .bind(&dto.title)
        .bind(dto.is_active)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Department")
    }

    #[instrument(skip(db))]
    pub async fn get_departments(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Department>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
            .fetch_one(db)
            .await?;
        let departments = sqlx::query_as::<_, Department>(
            "SELECT id, title, is_active, descriptions FROM departments
             ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(departments, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &SqlitePool, id: DepartmentId) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            "SELECT id, title, is_active, descriptions FROM departments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_department(
        db: &SqlitePool,
        id: DepartmentId,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let existing = Self::get_department(db, id).await?;
        sqlx::query_as::<_, Department>(
            "UPDATE departments SET title = ?, is_active = ?, descriptions = ? WHERE id = ?
             RETURNING id, title, is_active, descriptions",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Department")
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &SqlitePool, id: DepartmentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Department")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Department not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_course(db: &SqlitePool, dto: CreateCourseDto) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO courses (title, descriptions) VALUES (?, ?)
             RETURNING id, title, descriptions",
        )
        .bind(&dto.title)
        .bind(&dto.descriptions)
        .fetch_one(db)
        .await
        .on_write("Course")
    }

    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Course>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await?;
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, title, descriptions FROM courses ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;
        Ok(Paginated::new(courses, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &SqlitePool, id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>("SELECT id, title, descriptions FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_course(
        db: &SqlitePool,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course(db, id).await?;
        sqlx::query_as::<_, Course>(
            "UPDATE courses SET title = ?, descriptions = ? WHERE id = ?
             RETURNING id, title, descriptions",
        )
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("Course")
    }

    /// 409 while groups or topics still use the course.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &SqlitePool, id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Course")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }
        Ok(())
    }
}

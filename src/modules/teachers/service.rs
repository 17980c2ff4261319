use anyhow::anyhow;
use campusdesk_auth::Role;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_db::relations::{TEACHER_COURSES, TEACHER_DEPARTMENTS};
use campusdesk_models::staff::{CreateTeacherDto, Teacher, TeachersByIdsResponse, UpdateTeacherDto};
use campusdesk_models::{CourseId, DepartmentId, TeacherId, UserId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{info, instrument};

use crate::modules::users::service::{NewUser, UserService};

const TEACHER_SELECT: &str = "SELECT t.id, t.user_id, u.phone, u.full_name, t.description
     FROM teachers t
     JOIN users u ON u.id = t.user_id";

pub struct TeacherService;

impl TeacherService {
    /// Creates the user (role teacher) and the teacher profile in one
    /// transaction.
    #[instrument(skip(db, dto), fields(phone = %dto.user.phone))]
    pub async fn create_teacher(
        db: &SqlitePool,
        dto: CreateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let mut tx = db.begin().await?;

        let user = UserService::insert_user(
            &mut *tx,
            NewUser {
                phone: &dto.user.phone,
                password: &dto.user.password,
                full_name: dto.user.full_name.as_deref(),
                role: Role::Teacher,
                is_active: true,
            },
        )
        .await?;

        let id: TeacherId = sqlx::query_scalar(
            "INSERT INTO teachers (user_id, description) VALUES (?, ?) RETURNING id",
        )
        .bind(user.id)
        .bind(&dto.teacher.description)
        .fetch_one(&mut *tx)
        .await
        .on_write("Teacher")?;

        TEACHER_DEPARTMENTS
            .replace(&mut tx, id.get(), &dto.teacher.department_ids)
            .await
            .on_write("Teacher")?;
        TEACHER_COURSES
            .replace(&mut tx, id.get(), &dto.teacher.course_ids)
            .await
            .on_write("Teacher")?;

        tx.commit().await?;

        info!(teacher_id = %id, user_id = %user.id, "teacher created");
        Self::get_teacher(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &SqlitePool,
        params: PaginationParams,
    ) -> Result<Paginated<Teacher>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teachers")
            .fetch_one(db)
            .await?;

        let mut teachers = sqlx::query_as::<_, Teacher>(&format!(
            "{TEACHER_SELECT} ORDER BY t.id LIMIT ? OFFSET ?"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Self::attach_links(db, &mut teachers).await?;
        Ok(Paginated::new(teachers, total, &params))
    }

    /// Unknown ids are skipped.
    #[instrument(skip(db))]
    pub async fn get_teachers_by_ids(
        db: &SqlitePool,
        ids: &[TeacherId],
    ) -> Result<TeachersByIdsResponse, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("{TEACHER_SELECT} WHERE t.id IN ("));
        let mut list = query.separated(", ");
        for id in ids {
            list.push_bind(*id);
        }
        list.push_unseparated(") ORDER BY t.id");

        let mut teachers: Vec<Teacher> = query.build_query_as().fetch_all(db).await?;
        Self::attach_links(db, &mut teachers).await?;
        Ok(TeachersByIdsResponse { teachers })
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &SqlitePool, id: TeacherId) -> Result<Teacher, AppError> {
        let mut teacher = sqlx::query_as::<_, Teacher>(&format!("{TEACHER_SELECT} WHERE t.id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))?;

        teacher.department_ids = TEACHER_DEPARTMENTS.load(db, id.get()).await?;
        teacher.course_ids = TEACHER_COURSES.load(db, id.get()).await?;
        Ok(teacher)
    }

    pub async fn owner_of(db: &SqlitePool, id: TeacherId) -> Result<UserId, AppError> {
        sqlx::query_scalar("SELECT user_id FROM teachers WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &SqlitePool,
        id: TeacherId,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let existing = Self::get_teacher(db, id).await?;
        let mut tx = db.begin().await?;

        sqlx::query("UPDATE teachers SET description = ? WHERE id = ?")
            .bind(dto.description.or(existing.description))
            .bind(id)
            .execute(&mut *tx)
            .await
            .on_write("Teacher")?;

        if let Some(department_ids) = dto.department_ids {
            TEACHER_DEPARTMENTS
                .replace(&mut tx, id.get(), &department_ids)
                .await
                .on_write("Teacher")?;
        }
        if let Some(course_ids) = dto.course_ids {
            TEACHER_COURSES
                .replace(&mut tx, id.get(), &course_ids)
                .await
                .on_write("Teacher")?;
        }

        tx.commit().await?;
        Self::get_teacher(db, id).await
    }

    /// Removes the profile; the user account stays.
    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &SqlitePool, id: TeacherId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Teacher")?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }
        Ok(())
    }

    async fn attach_links(db: &SqlitePool, teachers: &mut [Teacher]) -> Result<(), AppError> {
        let ids: Vec<i64> = teachers.iter().map(|t| t.id.get()).collect();
        let mut departments = TEACHER_DEPARTMENTS.load_many::<DepartmentId>(db, &ids).await?;
        let mut courses = TEACHER_COURSES.load_many::<CourseId>(db, &ids).await?;

        for teacher in teachers {
            let key = teacher.id.get();
            teacher.department_ids = departments.remove(&key).unwrap_or_default();
            teacher.course_ids = courses.remove(&key).unwrap_or_default();
        }
        Ok(())
    }
}

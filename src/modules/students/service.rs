use anyhow::anyhow;
use campusdesk_auth::Role;
use campusdesk_core::{AppError, Paginated, PaginationParams};
use campusdesk_db::WriteResultExt;
use campusdesk_db::relations::STUDENT_COURSES;
use campusdesk_models::attendance::Attendance;
use campusdesk_models::students::{
    CreateStudentDto, RegisterStudentDto, Student, StudentFilterParams, StudentStatistics,
    StudentStatisticsDto, UpdateStudentDto,
};
use campusdesk_models::{CourseId, GroupId, StudentId, UserId};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, instrument};

use crate::modules::attendance::service::ATTENDANCE_COLUMNS;
use crate::modules::users::service::{NewUser, UserService};

const STUDENT_SELECT: &str = "SELECT s.id, s.user_id, u.phone, u.full_name, s.group_id, s.is_line,
        s.is_active, s.descriptions, s.created_at, s.updated_at
     FROM students s
     JOIN users u ON u.id = s.user_id";

/// Profile columns shared by the plain and the combined create.
struct NewStudent<'a> {
    user_id: UserId,
    group_id: Option<GroupId>,
    course_ids: &'a [CourseId],
    is_line: bool,
    is_active: bool,
    descriptions: Option<&'a str>,
}

pub struct StudentService;

impl StudentService {
    /// Attaches a student profile to an existing user.
    #[instrument(skip(db, dto), fields(user_id = %dto.user_id))]
    pub async fn create_student(
        db: &SqlitePool,
        dto: CreateStudentDto,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;
        let id = Self::insert_student(
            &mut tx,
            NewStudent {
                user_id: dto.user_id,
                group_id: dto.group_id,
                course_ids: &dto.course_ids,
                is_line: dto.is_line,
                is_active: dto.is_active,
                descriptions: dto.descriptions.as_deref(),
            },
        )
        .await?;
        tx.commit().await?;

        Self::get_student(db, id).await
    }

    /// Creates the user and the student profile in one transaction; nothing
    /// is left behind if either half fails.
    #[instrument(skip(db, dto), fields(phone = %dto.user.phone))]
    pub async fn register_student(
        db: &SqlitePool,
        dto: RegisterStudentDto,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let user = UserService::insert_user(
            &mut *tx,
            NewUser {
                phone: &dto.user.phone,
                password: &dto.user.password,
                full_name: dto.user.full_name.as_deref(),
                role: Role::Student,
                is_active: true,
            },
        )
        .await?;

        let profile = &dto.student;
        let id = Self::insert_student(
            &mut tx,
            NewStudent {
                user_id: user.id,
                group_id: profile.group_id,
                course_ids: &profile.course_ids,
                is_line: profile.is_line,
                is_active: profile.is_active,
                descriptions: profile.descriptions.as_deref(),
            },
        )
        .await?;

        tx.commit().await?;

        info!(student_id = %id, user_id = %user.id, "student registered");
        Self::get_student(db, id).await
    }

    async fn insert_student(
        conn: &mut SqliteConnection,
        new: NewStudent<'_>,
    ) -> Result<StudentId, AppError> {
        let now = Utc::now();
        let id: StudentId = sqlx::query_scalar(
            "INSERT INTO students
                (user_id, group_id, is_line, is_active, descriptions, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(new.user_id)
        .bind(new.group_id)
        .bind(new.is_line)
        .bind(new.is_active)
        .bind(new.descriptions)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .on_write("Student")?;

        STUDENT_COURSES
            .replace(conn, id.get(), new.course_ids)
            .await
            .on_write("Student")?;

        Ok(id)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &SqlitePool,
        filters: StudentFilterParams,
    ) -> Result<Paginated<Student>, AppError> {
        let params = filters.pagination;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE (? IS NULL OR group_id = ?)")
                .bind(filters.group_id)
                .bind(filters.group_id)
                .fetch_one(db)
                .await?;

        let mut students = sqlx::query_as::<_, Student>(&format!(
            "{STUDENT_SELECT} WHERE (? IS NULL OR s.group_id = ?) ORDER BY s.id LIMIT ? OFFSET ?"
        ))
        .bind(filters.group_id)
        .bind(filters.group_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        let ids: Vec<i64> = students.iter().map(|s| s.id.get()).collect();
        let mut courses = STUDENT_COURSES.load_many::<CourseId>(db, &ids).await?;
        for student in &mut students {
            student.course_ids = courses.remove(&student.id.get()).unwrap_or_default();
        }

        Ok(Paginated::new(students, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &SqlitePool, id: StudentId) -> Result<Student, AppError> {
        let mut student = sqlx::query_as::<_, Student>(&format!("{STUDENT_SELECT} WHERE s.id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        student.course_ids = STUDENT_COURSES.load(db, id.get()).await?;
        Ok(student)
    }

    /// The user id owning a student profile.
    pub async fn owner_of(db: &SqlitePool, id: StudentId) -> Result<UserId, AppError> {
        sqlx::query_scalar("SELECT user_id FROM students WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &SqlitePool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, id).await?;
        let mut tx = db.begin().await?;

        sqlx::query(
            "UPDATE students
             SET group_id = ?, is_line = ?, is_active = ?, descriptions = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(dto.group_id.or(existing.group_id))
        .bind(dto.is_line.unwrap_or(existing.is_line))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(dto.descriptions.or(existing.descriptions))
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await
        .on_write("Student")?;

        if let Some(course_ids) = dto.course_ids {
            STUDENT_COURSES
                .replace(&mut tx, id.get(), &course_ids)
                .await
                .on_write("Student")?;
        }

        tx.commit().await?;
        Self::get_student(db, id).await
    }

    /// Fails with 409 while attendance or homework rows reference the student.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &SqlitePool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("Student")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_attendances(
        db: &SqlitePool,
        id: StudentId,
        params: PaginationParams,
    ) -> Result<Paginated<Attendance>, AppError> {
        Self::owner_of(db, id).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendances WHERE student_id = ?")
            .bind(id)
            .fetch_one(db)
            .await?;

        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances
             WHERE student_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(Paginated::new(records, total, &params))
    }

    /// Counts over students registered in the inclusive date range; their
    /// group's end date decides studying versus graduated.
    #[instrument(skip(db))]
    pub async fn get_statistics(
        db: &SqlitePool,
        dto: StudentStatisticsDto,
    ) -> Result<StudentStatistics, AppError> {
        let today = Utc::now().date_naive();

        let (total_students, registered_students, studying_students, graduated_students): (
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM students),
                COUNT(s.id),
                COALESCE(SUM(CASE WHEN g.end_date >= ? THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN g.end_date < ? THEN 1 ELSE 0 END), 0)
             FROM students s
             LEFT JOIN study_groups g ON g.id = s.group_id
             WHERE date(s.created_at) BETWEEN ? AND ?",
        )
        .bind(today)
        .bind(today)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await?;

        Ok(StudentStatistics {
            total_students,
            registered_students,
            studying_students,
            graduated_students,
        })
    }
}

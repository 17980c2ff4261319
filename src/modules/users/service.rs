use anyhow::anyhow;
use campusdesk_auth::Role;
use campusdesk_core::{AppError, Paginated, hash_password};
use campusdesk_db::WriteResultExt;
use campusdesk_models::UserId;
use campusdesk_models::users::{
    CreateSuperuserDto, CreateUserDto, SuperuserCreated, UpdateUserDto, User, UserFilterParams,
};
use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{info, instrument};

use crate::metrics::track_user_created;

pub const USER_COLUMNS: &str = "id, phone, full_name, role, is_active, created_at, updated_at";

/// Fields for a new user row. `password` is the plain text; it is hashed on insert.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub phone: &'a str,
    pub password: &'a str,
    pub full_name: Option<&'a str>,
    pub role: Role,
    pub is_active: bool,
}

pub struct UserService;

impl UserService {
    /// Inserts a user on any executor, so combined creates can run it inside
    /// their transaction.
    #[instrument(skip_all, fields(phone = %new.phone, role = %new.role))]
    pub async fn insert_user<'e>(
        executor: impl SqliteExecutor<'e>,
        new: NewUser<'_>,
    ) -> Result<User, AppError> {
        let password_hash = hash_password(new.password)?;
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (phone, password, full_name, role, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new.phone)
        .bind(&password_hash)
        .bind(new.full_name)
        .bind(new.role)
        .bind(new.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .on_write("User")?;

        track_user_created(user.role.as_str());
        Ok(user)
    }

    #[instrument(skip(db, dto), fields(phone = %dto.phone))]
    pub async fn create_user(db: &SqlitePool, dto: CreateUserDto) -> Result<User, AppError> {
        Self::insert_user(
            db,
            NewUser {
                phone: &dto.phone,
                password: &dto.password,
                full_name: dto.full_name.as_deref(),
                role: dto.role,
                is_active: dto.is_active,
            },
        )
        .await
    }

    #[instrument(skip(db, dto), fields(phone = %dto.phone))]
    pub async fn create_superuser(
        db: &SqlitePool,
        dto: CreateSuperuserDto,
    ) -> Result<SuperuserCreated, AppError> {
        let user = Self::insert_user(
            db,
            NewUser {
                phone: &dto.phone,
                password: &dto.password,
                full_name: dto.full_name.as_deref(),
                role: Role::Admin,
                is_active: true,
            },
        )
        .await?;

        info!(user_id = %user.id, "superuser created");
        Ok(SuperuserCreated {
            message: "Superuser created successfully".to_string(),
            user_id: user.id,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_users(
        db: &SqlitePool,
        filters: UserFilterParams,
    ) -> Result<Paginated<User>, AppError> {
        let params = filters.pagination;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE (? IS NULL OR role = ?)")
                .bind(filters.role)
                .bind(filters.role)
                .fetch_one(db)
                .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE (? IS NULL OR role = ?)
             ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(filters.role)
        .bind(filters.role)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(Paginated::new(users, total, &params))
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &SqlitePool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &SqlitePool,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;
        let phone = dto.phone.unwrap_or_else(|| existing.phone.into_inner());
        let full_name = dto.full_name.or(existing.full_name);
        let role = dto.role.unwrap_or(existing.role);
        let is_active = dto.is_active.unwrap_or(existing.is_active);

        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET phone = ?, full_name = ?, role = ?, is_active = ?,
                 password = COALESCE(?, password), updated_at = ?
             WHERE id = ?
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&phone)
        .bind(&full_name)
        .bind(role)
        .bind(is_active)
        .bind(&password_hash)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(db)
        .await
        .on_write("User")
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &SqlitePool, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .on_delete("User")?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }
        Ok(())
    }
}

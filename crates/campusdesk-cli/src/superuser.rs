use anyhow::{Context, bail};
use campusdesk_auth::Role;
use campusdesk_core::hash_password;
use campusdesk_models::UserId;
use campusdesk_models::value_types::Phone;
use chrono::Utc;
use sqlx::SqlitePool;

/// Inserts an active admin. Fails if the phone is already taken.
pub async fn create_superuser(
    db: &SqlitePool,
    phone: &str,
    full_name: Option<&str>,
    password: &str,
) -> anyhow::Result<UserId> {
    let phone: Phone = phone.parse().context("invalid phone number")?;
    let password_hash = hash_password(password).map_err(|e| e.error)?;
    let now = Utc::now();

    let user_id: Option<UserId> = sqlx::query_scalar(
        "INSERT INTO users (phone, password, full_name, role, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)
         ON CONFLICT (phone) DO NOTHING
         RETURNING id",
    )
    .bind(&phone)
    .bind(&password_hash)
    .bind(full_name)
    .bind(Role::Admin)
    .bind(now)
    .bind(now)
    .fetch_optional(db)
    .await?;

    match user_id {
        Some(id) => Ok(id),
        None => bail!("User with this phone already exists"),
    }
}

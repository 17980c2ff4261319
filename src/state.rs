use campusdesk_config::{CorsConfig, DatabaseConfig, JwtConfig};
use campusdesk_db::{init_db_pool, run_migrations};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

/// Connects, migrates and loads configuration from the environment.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool(&DatabaseConfig::from_env()).await?;
    run_migrations(&db).await?;

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    })
}

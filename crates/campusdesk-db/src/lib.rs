//! # campusdesk db
//!
//! SQLite connection pool, schema migrations, link-table helpers and the
//! mapping from constraint violations to API errors.
//!
//! Foreign keys are switched on for every pooled connection, so the
//! `ON DELETE CASCADE / RESTRICT / SET NULL` clauses in the schema are what
//! enforce the relational invariants.
//!
//! ```ignore
//! use campusdesk_config::DatabaseConfig;
//! use campusdesk_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//! run_migrations(&pool).await?;
//! ```

pub mod constraints;
pub mod relations;

use std::str::FromStr;
use std::time::Duration;

use campusdesk_config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

pub use constraints::WriteResultExt;
pub use relations::LinkTable;
pub use sqlx::SqlitePool;

pub type DbPool = SqlitePool;

pub async fn init_db_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    info!(url = %config.url, max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

//! # campusdesk config
//!
//! Configuration structures loaded from environment variables. Every value
//! has a default so a bare `cargo run` works against a local SQLite file.
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`cors`]: allowed origins
//! - [`database`]: connection string and pool size
//! - [`server`]: bind address, metrics port, observability switches
//!
//! ```ignore
//! use campusdesk_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt = JwtConfig::from_env();
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Parses `key` from the environment, falling back to `default` when unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

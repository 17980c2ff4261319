use std::env;

use crate::env_or;

pub const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 5 * 60;
pub const DEFAULT_REFRESH_EXPIRY_SECS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "campusdesk-dev-secret-change-me".to_string()),
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY_SECS),
            refresh_token_expiry: env_or("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY_SECS),
        }
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: DEFAULT_ACCESS_EXPIRY_SECS,
            refresh_token_expiry: DEFAULT_REFRESH_EXPIRY_SECS,
        }
    }
}

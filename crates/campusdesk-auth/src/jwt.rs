//! HS256 token encoding and decoding.
//!
//! Decoding checks the signature, the expiry (no leeway) and the
//! `token_type`; it does not consult the blacklist, which needs storage.
//!
//! ```ignore
//! use campusdesk_auth::{create_refresh_token, create_access_token, decode_access_token, Role};
//!
//! let refresh = create_refresh_token(user_id, &config)?;
//! let access = create_access_token(user_id, Role::Student, &refresh.claims.jti, &config)?;
//! let claims = decode_access_token(&access.token, &config)?;
//! ```

use std::fmt;

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use campusdesk_config::JwtConfig;
use campusdesk_core::AppError;

use crate::claims::{Claims, RefreshTokenClaims, TokenClaims, TokenType};
use crate::role::Role;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken<C> {
    pub token: String,
    pub claims: C,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    WrongType { expected: TokenType },
    Revoked,
    Invalid,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Expired => f.write_str("Token is expired"),
            TokenError::WrongType { expected } => {
                let kind = match expected {
                    TokenType::Access => "access",
                    TokenType::Refresh => "refresh",
                };
                write!(f, "Token has wrong type, expected {kind} token")
            }
            TokenError::Revoked => f.write_str("Token is blacklisted"),
            TokenError::Invalid => f.write_str("Token is invalid"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::unauthorized(err.to_string()).with_code("token_not_valid")
    }
}

pub fn create_refresh_token(
    user_id: i64,
    config: &JwtConfig,
) -> Result<IssuedToken<RefreshTokenClaims>, AppError> {
    let now = Utc::now().timestamp();
    let claims = RefreshTokenClaims {
        token_type: TokenType::Refresh,
        user_id,
        jti: Uuid::new_v4().to_string(),
        exp: now + config.refresh_token_expiry,
        iat: now,
    };
    let token = sign(&claims, config)?;
    Ok(IssuedToken { token, claims })
}

/// Mints an access token descending from the refresh token whose jti is `lineage`.
pub fn create_access_token(
    user_id: i64,
    role: Role,
    lineage: &str,
    config: &JwtConfig,
) -> Result<IssuedToken<Claims>, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        token_type: TokenType::Access,
        user_id,
        role,
        jti: Uuid::new_v4().to_string(),
        lineage: lineage.to_string(),
        exp: now + config.access_token_expiry,
        iat: now,
    };
    let token = sign(&claims, config)?;
    Ok(IssuedToken { token, claims })
}

pub fn decode_access_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    expect_type(token, config, TokenType::Access)?;
    verify(token, config)
}

pub fn decode_refresh_token(
    token: &str,
    config: &JwtConfig,
) -> Result<RefreshTokenClaims, TokenError> {
    expect_type(token, config, TokenType::Refresh)?;
    verify(token, config)
}

pub fn decode_any_token(token: &str, config: &JwtConfig) -> Result<TokenClaims, TokenError> {
    verify(token, config)
}

fn expect_type(token: &str, config: &JwtConfig, expected: TokenType) -> Result<(), TokenError> {
    let common: TokenClaims = verify(token, config)?;
    if common.token_type != expected {
        return Err(TokenError::WrongType { expected });
    }
    Ok(())
}

fn sign<C: serde::Serialize>(claims: &C, config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to sign token: {e}")))
}

fn verify<C: DeserializeOwned>(token: &str, config: &JwtConfig) -> Result<C, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<C>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

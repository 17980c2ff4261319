//! JWT payloads.
//!
//! Both token kinds carry `token_type`, `user_id`, `jti`, `iat` and `exp`.
//! Access tokens add the user's `role` and a `lineage`: the `jti` of the
//! refresh token they were minted from. Blacklisting a refresh token
//! therefore also retires every access token of its lineage.

use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Access token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub token_type: TokenType,
    pub user_id: i64,
    pub role: Role,
    pub jti: String,
    pub lineage: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub token_type: TokenType,
    pub user_id: i64,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// The fields shared by every token, for endpoints that accept either kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub token_type: TokenType,
    pub user_id: i64,
    pub jti: String,
    #[serde(default)]
    pub lineage: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl TokenClaims {
    /// Every jti whose revocation kills this token.
    pub fn revocation_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.jti.as_str()];
        if let Some(lineage) = self.lineage.as_deref() {
            if lineage != self.jti {
                ids.push(lineage);
            }
        }
        ids
    }
}

impl From<Claims> for TokenClaims {
    fn from(c: Claims) -> Self {
        Self {
            token_type: c.token_type,
            user_id: c.user_id,
            jti: c.jti,
            lineage: Some(c.lineage),
            exp: c.exp,
            iat: c.iat,
        }
    }
}

impl From<RefreshTokenClaims> for TokenClaims {
    fn from(c: RefreshTokenClaims) -> Self {
        Self {
            token_type: c.token_type,
            user_id: c.user_id,
            jti: c.jti,
            lineage: None,
            exp: c.exp,
            iat: c.iat,
        }
    }
}

//! # campusdesk auth
//!
//! Everything needed to decide *who* is calling and *whether* they may:
//!
//! - [`claims`]: JWT payloads for access and refresh tokens
//! - [`jwt`]: HS256 encoding and decoding with typed token errors
//! - [`role`]: the single role enum that replaces per-user capability flags
//! - [`policy`]: permission predicates evaluated per request and per object
//! - [`otp`]: one-time codes for password reset
//!
//! Blacklist lookups need the database and live in the server's auth
//! service; this crate stays storage-free apart from the role column codec.

pub mod claims;
pub mod jwt;
pub mod otp;
pub mod policy;
pub mod role;

pub use claims::{Claims, RefreshTokenClaims, TokenClaims, TokenType};
pub use jwt::{
    IssuedToken, TokenError, create_access_token, create_refresh_token, decode_access_token,
    decode_any_token, decode_refresh_token,
};
pub use policy::{Access, Denial, Policy, Principal, authorize, authorize_object};
pub use role::Role;

//! # campusdesk core
//!
//! Foundational types shared by every campusdesk crate:
//!
//! - [`errors`]: the application error and its JSON envelope
//! - [`pagination`]: page/limit query parameters and the paginated response shape
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: deserialization helpers for query strings
//!
//! # Example
//!
//! ```ignore
//! use campusdesk_core::{AppError, Paginated, PaginationParams, hash_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Group not found"));
//! let hash = hash_password("Secret123")?;
//! let params = PaginationParams::default();
//! assert_eq!(params.limit(), 100);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};

//! # campusdesk models
//!
//! Rows, request bodies and response shapes for every campusdesk resource.
//!
//! - [`ids`]: one typed id per table
//! - [`value_types`]: [`Phone`](value_types::Phone) and [`Price`](value_types::Price)
//! - [`users`], [`auth`]: accounts and the token endpoints
//! - [`students`], [`staff`], [`parents`]: people
//! - [`courses`], [`groups`], [`attendance`], [`homework`]: teaching
//! - [`schedule`], [`payments`], [`comments`]: everything else
//!
//! Row types derive `sqlx::FromRow`; id lists for many-to-many relations are
//! `#[sqlx(skip)]` and filled in by the service that loads the row.

pub mod attendance;
pub mod auth;
pub mod comments;
pub mod courses;
pub mod groups;
pub mod homework;
pub mod ids;
pub mod parents;
pub mod payments;
pub mod schedule;
pub mod staff;
pub mod students;
pub mod users;
pub mod value_types;

pub use ids::*;
pub use value_types::{Phone, Price, ValueTypeError};

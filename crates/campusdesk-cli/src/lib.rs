//! # campusdesk CLI
//!
//! Administrative commands and fake-data seeding for development.
//!
//! ```ignore
//! use campusdesk_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::new(4)).await?;
//! ```

pub mod superuser;
pub mod seeder;

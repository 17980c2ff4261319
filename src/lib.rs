//! # Campusdesk API
//!
//! Administrative backend for a training center: users and their roles,
//! students, teachers, workers and parents, study groups and courses,
//! attendance, homework, payments and the room timetable. Served over
//! HTTP with Axum on SQLite.
//!
//! ## Layout
//!
//! ```text
//! src/
//! ├── middleware/   # Bearer-token extractors and route policies
//! ├── modules/      # Feature modules (controller, router, service)
//! ├── logging.rs    # Tracing setup and request logging
//! ├── metrics.rs    # Prometheus recorder and business counters
//! ├── router.rs     # /api/v1 route table, CORS, path normalization
//! ├── state.rs      # Shared AppState
//! └── validator.rs  # JSON extractors that run `validator` rules
//! ```
//!
//! Domain types live in `campusdesk-models`, token handling and policies in
//! `campusdesk-auth`, and the pool, migrations and constraint mapping in
//! `campusdesk-db`.
//!
//! ## Authentication
//!
//! `POST /api/v1/auth/login` returns an access/refresh pair. Every request
//! carrying `Authorization: Bearer <access>` is checked against the token
//! blacklist and the user's current role and active flag.
//!
//! ## Environment
//!
//! ```bash
//! DATABASE_URL=sqlite://campusdesk.db?mode=rwc
//! JWT_SECRET=change-me
//! JWT_ACCESS_EXPIRY=300
//! JWT_REFRESH_EXPIRY=86400
//! ALLOWED_ORIGINS=*
//! ```
//!
//! The first admin is created with `campusdesk-cli create-superuser`.

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use campusdesk_auth;
pub use campusdesk_config;
pub use campusdesk_core;
pub use campusdesk_db;
pub use campusdesk_models;

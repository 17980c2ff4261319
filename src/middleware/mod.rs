//! Request extractors for authentication and authorization.
//!
//! 1. `Authorization: Bearer <access token>` is verified by
//!    [`AuthService::resolve_principal`](crate::modules::auth::service::AuthService::resolve_principal):
//!    signature, expiry, token type, blacklist (jti and lineage) and the
//!    user's current role and active flag.
//! 2. A `Require*` extractor evaluates the route's policies for the request
//!    method and yields a [`PolicyGuard`](auth::PolicyGuard).
//! 3. Handlers that load an owned resource call
//!    [`PolicyGuard::check_object`](auth::PolicyGuard::check_object) with its owner.
//!
//! ```ignore
//! use crate::middleware::auth::RequireAuthenticatedAdminOrOwner;
//!
//! async fn update_submission(
//!     State(state): State<AppState>,
//!     RequireAuthenticatedAdminOrOwner(guard): RequireAuthenticatedAdminOrOwner,
//!     Path(id): Path<HomeWorkId>,
//! ) -> Result<Json<HomeWork>, AppError> {
//!     let owner = HomeworkService::submission_owner(&state.db, id).await?;
//!     guard.check_object(Some(owner.get()))?;
//!     // ...
//! }
//! ```

pub mod auth;

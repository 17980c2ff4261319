//! Login, token lifecycle and password recovery.
//!
//! Everything token-related goes through [`service::AuthService`]; the
//! `/auth` and `/token` handlers only unpack requests for it.

pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_auth_router, init_token_router};

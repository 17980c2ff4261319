pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_attendances_router, init_statuses_router};

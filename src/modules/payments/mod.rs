pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_months_router, init_payment_types_router, init_payments_router};

pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_rooms_router, init_table_types_router, init_tables_router};

//! HTTP route definitions.

pub mod monitoring;
pub mod routes;

pub use routes::create_router;

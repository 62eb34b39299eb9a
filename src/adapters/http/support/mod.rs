//! Health-support HTTP module: the stateless chat endpoint.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::SupportHandlers;
pub use routes::support_routes;

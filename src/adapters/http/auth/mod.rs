//! Auth HTTP module: registration, login, and the current-user profile.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AuthHandlers;
pub use routes::auth_routes;

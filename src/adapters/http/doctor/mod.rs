//! Doctor directory HTTP module.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::DoctorHandlers;
pub use routes::doctor_routes;

//! Authentication adapters - password hashing and session tokens.

mod argon_hasher;
mod jwt_service;

pub use argon_hasher::ArgonPasswordHasher;
pub use jwt_service::JwtTokenService;

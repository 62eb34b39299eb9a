//! Ports - interfaces to everything external.
//!
//! Adapters implement these traits; application services depend only on the
//! traits, so every external collaborator (store, completion provider,
//! hashing, token signing) can be swapped for a test double.

mod completion;
mod consultation_repository;
mod doctor_repository;
mod password_hasher;
mod token_service;
mod user_repository;

pub use completion::{
    ChatMessage, ChatRole, CompletionClient, CompletionError, CompletionRequest,
    CompletionResponse,
};
pub use consultation_repository::ConsultationRepository;
pub use doctor_repository::DoctorRepository;
pub use password_hasher::PasswordHasher;
pub use token_service::TokenService;
pub use user_repository::UserRepository;

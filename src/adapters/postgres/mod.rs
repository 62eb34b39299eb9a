//! PostgreSQL adapters - sqlx implementations of the repository ports.

mod consultation_repository;
mod doctor_repository;
mod user_repository;

pub use consultation_repository::PostgresConsultationRepository;
pub use doctor_repository::PostgresDoctorRepository;
pub use user_repository::PostgresUserRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Wraps a sqlx error as an infrastructure DomainError.
fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
}

/// Returns the violated unique constraint name, if this error is a
/// PostgreSQL unique violation (SQLSTATE 23505).
fn unique_violation(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db) = err {
        if db.code().as_deref() == Some("23505") {
            return Some(db.constraint().unwrap_or_default().to_string());
        }
    }
    None
}

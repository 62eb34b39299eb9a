//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    WeakPassword,

    // Conflict errors
    EmailExists,
    UsernameExists,

    // Authentication errors
    EmailNotFound,
    InvalidPassword,

    // Not found errors
    UserNotFound,
    DoctorNotFound,
    ConsultationNotFound,

    // State errors
    ConsultationNotActive,
    InvalidStateTransition,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // Upstream errors
    CompletionProviderError,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::WeakPassword => "WEAK_PASSWORD",
            ErrorCode::EmailExists => "EMAIL_EXISTS",
            ErrorCode::UsernameExists => "USERNAME_EXISTS",
            ErrorCode::EmailNotFound => "EMAIL_NOT_FOUND",
            ErrorCode::InvalidPassword => "INVALID_PASSWORD",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::DoctorNotFound => "DOCTOR_NOT_FOUND",
            ErrorCode::ConsultationNotFound => "CONSULTATION_NOT_FOUND",
            ErrorCode::ConsultationNotActive => "CONSULTATION_NOT_ACTIVE",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::CompletionProviderError => "COMPLETION_PROVIDER_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates an error tagged with the offending request field.
    pub fn for_field(
        code: ErrorCode,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(code, message).with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the offending request field, when one was tagged.
    pub fn field(&self) -> Option<&str> {
        self.details.get("field").map(String::as_str)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

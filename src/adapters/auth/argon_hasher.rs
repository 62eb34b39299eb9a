//! Argon2id implementation of the PasswordHasher port.
//!
//! Hashes are salted PHC strings; verification is constant-time inside the
//! argon2 crate.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PasswordHasher;

/// Argon2id password hasher with default parameters.
#[derive(Debug, Clone, Default)]
pub struct ArgonPasswordHasher;

impl ArgonPasswordHasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for ArgonPasswordHasher {
    fn hash(&self, raw: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Password hashing failed: {}", e),
                )
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, raw: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Stored password hash is malformed: {}", e),
            )
        })?;

        match Argon2::default().verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Password verification failed: {}", e),
            )),
        }
    }
}

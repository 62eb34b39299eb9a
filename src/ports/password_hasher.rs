//! PasswordHasher port - opaque salted one-way hashing.

use crate::domain::foundation::DomainError;

/// Port for password hashing and verification.
///
/// Hashing is CPU-bound and synchronous; callers on async paths should keep
/// inputs short (they are - raw passwords).
pub trait PasswordHasher: Send + Sync {
    /// Hashes a raw password with a fresh salt.
    fn hash(&self, raw: &str) -> Result<String, DomainError>;

    /// Verifies a raw password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for malformed hashes.
    fn verify(&self, raw: &str, hash: &str) -> Result<bool, DomainError>;
}

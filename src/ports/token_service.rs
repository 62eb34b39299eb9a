//! TokenService port - opaque session token signing and verification.

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::domain::identity::UserProfile;

/// Port for session token issue and verification.
///
/// Tokens encode `{subject: user id, username}` with a bounded validity
/// window; the adapter owns the signing algorithm and expiry policy.
pub trait TokenService: Send + Sync {
    /// Signs a session token for the given profile.
    fn issue(&self, profile: &UserProfile) -> Result<String, AuthError>;

    /// Verifies a token and extracts the authenticated user.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` when the validity window has passed
    /// - `InvalidToken` for anything else that fails verification
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

//! Authentication types for the domain layer.
//!
//! These types represent an authenticated user extracted from a session
//! token. They have no signing-library dependencies - any token backend can
//! populate them via the `TokenService` port.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The user the token was issued to.
    pub id: UserId,

    /// Username claim carried in the token.
    pub username: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    ///
    /// Typically called by the `TokenService` adapter after successfully
    /// verifying a token.
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// Token could not be produced (signing failure).
    #[error("Token signing failed: {0}")]
    SigningFailed(String),
}

impl AuthError {
    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_carries_claims() {
        let user = AuthenticatedUser::new(UserId::from_i64(9), "budi");
        assert_eq!(user.id, UserId::from_i64(9));
        assert_eq!(user.username, "budi");
    }

    #[test]
    fn expired_and_invalid_tokens_require_reauthentication() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::SigningFailed("boom".into()).requires_reauthentication());
    }
}

//! HS256 JWT implementation of the TokenService port.
//!
//! Session tokens encode `{sub: user id, username}` with a bounded validity
//! window (1 hour by default, from `AuthConfig`).

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::domain::identity::UserProfile;
use crate::ports::TokenService;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id the token was issued to.
    sub: String,
    /// Username, for display without a profile lookup.
    username: String,
    /// Issued-at, seconds since epoch.
    iat: i64,
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    /// Creates a token service with the given signing secret and validity window.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway; expiry is exact.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, profile: &UserProfile) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: profile.id.to_string(),
            username: profile.username.clone(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailed(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let user_id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(user_id, data.claims.username))
    }
}

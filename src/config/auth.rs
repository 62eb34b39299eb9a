//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum length accepted for the JWT signing secret in production.
const MIN_SECRET_LENGTH: usize = 32;

/// Authentication configuration (JWT signing)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify session tokens (HS256)
    pub jwt_secret: Secret<String>,

    /// Session token validity window in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    /// Get token validity window as Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Expose the signing secret (for the token service)
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.expose_secret()
    }

    /// Validate authentication configuration
    ///
    /// In production, requires a secret of at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if *environment == Environment::Production
            && self.jwt_secret.expose_secret().len() < MIN_SECRET_LENGTH
        {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.token_ttl_secs == 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        Ok(())
    }
}

fn default_token_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: Secret::new(secret.to_string()),
            token_ttl_secs: default_token_ttl(),
        }
    }

    #[test]
    fn test_default_ttl_is_one_hour() {
        let config = config_with_secret("x".repeat(40).as_str());
        assert_eq!(config.token_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_validation_missing_secret() {
        let config = config_with_secret("");
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_short_secret_rejected_in_production() {
        let config = config_with_secret("short");
        // Allowed in development
        assert!(config.validate(&Environment::Development).is_ok());
        // Rejected in production
        assert!(config.validate(&Environment::Production).is_err());
    }

    #[test]
    fn test_validation_zero_ttl() {
        let mut config = config_with_secret("x".repeat(40).as_str());
        config.token_ttl_secs = 0;
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = config_with_secret("x".repeat(40).as_str());
        assert!(config.validate(&Environment::Production).is_ok());
    }
}

//! Completion provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion provider configuration (Groq)
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Groq API key
    pub api_key: Secret<String>,

    /// Base URL for the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Expose the API key (for the completion client)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Validate completion provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidAiBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "meta-llama/llama-4-maverick-17b-128e-instruct".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: &str) -> AiConfig {
        AiConfig {
            api_key: Secret::new(key.to_string()),
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = config_with_key("gsk_xxx");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_timeout_duration() {
        let mut config = config_with_key("gsk_xxx");
        config.timeout_secs = 30;
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validation_missing_key() {
        let config = config_with_key("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_base_url() {
        let mut config = config_with_key("gsk_xxx");
        config.base_url = "api.groq.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = config_with_key("gsk_xxx");
        assert!(config.validate().is_ok());
    }
}

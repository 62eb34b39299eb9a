//! Groq completion client - implementation of CompletionClient against
//! Groq's OpenAI-compatible chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GroqConfig::new(api_key)
//!     .with_model("meta-llama/llama-4-maverick-17b-128e-instruct")
//!     .with_base_url("https://api.groq.com/openai/v1");
//!
//! let client = GroqClient::new(config);
//! ```
//!
//! Retries live in `ResilientCompletionClient`, not here; this adapter does
//! one request and classifies the outcome.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    ChatMessage, ChatRole, CompletionClient, CompletionError, CompletionRequest,
    CompletionResponse,
};

/// Configuration for the Groq client.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GroqConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "meta-llama/llama-4-maverick-17b-128e-instruct".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Groq API client.
pub struct GroqClient {
    config: GroqConfig,
    client: Client,
}

impl GroqClient {
    /// Creates a new Groq client with the given configuration.
    pub fn new(config: GroqConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to the wire format.
    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        let mut messages = Vec::new();

        // System prompt always leads the conversation
        if let Some(ref system) = request.system {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(WireMessage::from(msg));
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stop: if request.stop.is_empty() {
                None
            } else {
                Some(request.stop.clone())
            },
        }
    }

    /// Sends a request and classifies transport failures.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, CompletionError> {
        let wire_request = self.to_wire_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    CompletionError::connection(e.to_string())
                } else {
                    CompletionError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, CompletionError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(CompletionError::AuthenticationFailed),
            429 => Err(CompletionError::RateLimited {
                retry_after_secs: parse_retry_after(&error_body),
            }),
            400 => Err(CompletionError::InvalidRequest(error_body)),
            500..=599 => Err(CompletionError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(CompletionError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses a completion response body.
    async fn parse_response(
        &self,
        response: Response,
    ) -> Result<CompletionResponse, CompletionError> {
        let response = self.handle_response_status(response).await?;

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::parse("No choices in response"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| CompletionError::parse("Choice has no content"))?;

        Ok(CompletionResponse {
            content,
            model: wire_response.model,
        })
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let response = self.send_request(&request).await?;
        self.parse_response(response).await
    }
}

/// Parses retry-after hints from a rate-limit error body.
fn parse_retry_after(error_body: &str) -> u32 {
    // Groq embeds "try again in Xs" in the error message sometimes
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
        if let Some(msg) = parsed
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            if let Some(idx) = msg.find("try again in ") {
                let rest = &msg[idx + 13..];
                if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                    if let Ok(secs) = rest[..num_end].parse::<u32>() {
                        return secs;
                    }
                }
            }
        }
    }
    30 // Default retry after
}

// ════════════════════════════════════════════════════════════════════════════
// Wire format
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: match msg.role {
                ChatRole::System => "system",
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            }
            .to_string(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GroqClient {
        GroqClient::new(GroqConfig::new("gsk_test"))
    }

    #[test]
    fn system_prompt_leads_the_wire_messages() {
        let client = test_client();
        let request = CompletionRequest::new()
            .with_system("Be a doctor")
            .with_message(ChatRole::User, "hello");

        let wire = client.to_wire_request(&request);
        assert_eq!(wire.messages.len(), 2);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[0].content, "Be a doctor");
        assert_eq!(wire.messages[1].role, "user");
    }

    #[test]
    fn empty_stop_list_is_omitted_from_the_wire() {
        let client = test_client();
        let without = client.to_wire_request(&CompletionRequest::new());
        assert!(without.stop.is_none());

        let with = client.to_wire_request(&CompletionRequest::new().with_stop("#END"));
        assert_eq!(with.stop, Some(vec!["#END".to_string()]));
    }

    #[test]
    fn completions_url_joins_base_and_path() {
        let client = GroqClient::new(
            GroqConfig::new("gsk_test").with_base_url("https://example.com/openai/v1"),
        );
        assert_eq!(
            client.completions_url(),
            "https://example.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn retry_after_parses_provider_hint() {
        let body = r#"{"error":{"message":"Rate limit reached, try again in 7s."}}"#;
        assert_eq!(parse_retry_after(body), 7);
    }

    #[test]
    fn retry_after_defaults_without_hint() {
        assert_eq!(parse_retry_after("not json"), 30);
        assert_eq!(parse_retry_after(r#"{"error":{"message":"slow down"}}"#), 30);
    }

    #[test]
    fn response_without_choices_is_a_parse_error() {
        let wire: WireResponse =
            serde_json::from_str(r#"{"model":"m","choices":[]}"#).unwrap();
        assert!(wire.choices.is_empty());
    }
}

//! Completion client port - interface to the hosted language model.
//!
//! The provider is treated as a black-box text-completion service with a
//! synchronous request/response contract. Errors are classified so the
//! resilience wrapper can retry transient failures and fall back on the
//! rest.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::consultation::MessageRole;

/// Port for chat-completion providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, CompletionError>;
}

/// Request for a completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Conversation messages (history + current user message).
    pub messages: Vec<ChatMessage>,
    /// System prompt to guide model behavior.
    pub system: Option<String>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Stop sequences; generation halts before emitting any of these.
    pub stop: Vec<String>,
}

impl CompletionRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: ChatRole, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::new(role, content));
        self
    }

    /// Sets the system prompt.
    pub fn with_system(mut self, prompt: impl Into<String>) -> Self {
        self.system = Some(prompt.into());
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Adds a stop sequence.
    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop.push(stop.into());
        self
    }
}

/// A message in the completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Creates a new message.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Role of the message sender on the completion wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instructions (guides model behavior).
    System,
    /// Patient input.
    User,
    /// Model response.
    Assistant,
}

impl From<MessageRole> for ChatRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => ChatRole::User,
            MessageRole::Assistant => ChatRole::Assistant,
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Generated text.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
}

/// Completion provider errors.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// TCP connection refused or host unreachable.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Other network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider returned a server error.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Response body missing or malformed (including an empty choice list).
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CompletionError {
    /// Creates a connection failure error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a retry may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Timeout { .. }
                | CompletionError::ConnectionFailed(_)
                | CompletionError::Network(_)
                | CompletionError::RateLimited { .. }
                | CompletionError::Unavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_accumulates_fields() {
        let request = CompletionRequest::new()
            .with_system("Be a doctor")
            .with_message(ChatRole::User, "I have a headache")
            .with_temperature(0.7)
            .with_max_tokens(1000)
            .with_stop("#END");

        assert_eq!(request.system, Some("Be a doctor".to_string()));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, ChatRole::User);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1000));
        assert_eq!(request.stop, vec!["#END".to_string()]);
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn domain_roles_map_onto_wire_roles() {
        assert_eq!(ChatRole::from(MessageRole::User), ChatRole::User);
        assert_eq!(ChatRole::from(MessageRole::Assistant), ChatRole::Assistant);
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(CompletionError::Timeout { timeout_secs: 60 }.is_retryable());
        assert!(CompletionError::connection("refused").is_retryable());
        assert!(CompletionError::network("reset").is_retryable());
        assert!(CompletionError::RateLimited { retry_after_secs: 30 }.is_retryable());
        assert!(CompletionError::unavailable("502").is_retryable());
    }

    #[test]
    fn fatal_errors_are_not_retryable() {
        assert!(!CompletionError::AuthenticationFailed.is_retryable());
        assert!(!CompletionError::parse("empty choices").is_retryable());
        assert!(!CompletionError::InvalidRequest("bad body".into()).is_retryable());
    }
}

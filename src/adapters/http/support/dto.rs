//! HTTP DTOs for the health-support chat endpoint.

use serde::{Deserialize, Serialize};

use crate::application::SupportReply;
use crate::domain::support::ChatTurn;

/// Request for one stateless chat turn; the caller carries the history.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Reply plus extracted topic label.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub topic: String,
}

impl From<SupportReply> for ChatResponse {
    fn from(reply: SupportReply) -> Self {
        Self {
            message: reply.message,
            topic: reply.topic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consultation::MessageRole;

    #[test]
    fn chat_request_parses_role_tagged_history() {
        let json = r#"{
            "message": "masih demam",
            "history": [
                {"role": "user", "content": "saya demam"},
                {"role": "assistant", "content": "Sudah berapa lama?"}
            ]
        }"#;

        let request: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[0].role, MessageRole::User);
        assert_eq!(request.history[1].role, MessageRole::Assistant);
    }

    #[test]
    fn history_defaults_to_empty() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(request.history.is_empty());
    }
}

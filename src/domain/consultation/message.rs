//! Messages - the append-only consultation transcript.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ConsultationId, DomainError, ErrorCode, MessageId, Timestamp};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The patient.
    User,
    /// The AI doctor persona.
    Assistant,
}

impl MessageRole {
    /// Storage and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Unknown message role: {}", other),
            )),
        }
    }
}

/// One entry in a consultation transcript.
///
/// Messages are append-only and never mutated after creation. The
/// transcript is ordered by `timestamp` ascending and replayed in full to
/// the completion provider on every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub consultation_id: ConsultationId,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: Timestamp,
}

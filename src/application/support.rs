//! SupportService - stateless health-support chat with topic extraction.
//!
//! No consultation record is persisted; the caller supplies the history on
//! every request. The reply goes through the resilience wrapper, so it can
//! never hard-fail; the topic label is a secondary single-attempt
//! completion with a cheap fixed fallback.

use std::sync::Arc;

use crate::adapters::ai::ResilientCompletionClient;
use crate::domain::consultation::MessageRole;
use crate::domain::support::{analyze_history, ChatTurn, DEFAULT_TOPIC};
use crate::ports::{ChatRole, CompletionRequest};

/// System instruction for the health-support assistant.
const SUPPORT_SYSTEM_PROMPT: &str = "\
You are an experienced medical professional providing virtual health consultations.

CONSULTATION APPROACH:
1. Ask relevant follow-up questions to understand the patient's symptoms thoroughly
2. Maintain a professional, empathetic tone
3. Follow a structured medical consultation approach (symptoms, duration, severity, \
alleviating/aggravating factors)
4. Provide evidence-based information and practical advice
5. Always recommend seeking in-person medical care for serious conditions
6. Respond in the same language the patient uses (support both English and Indonesian)

MEMORY GUIDELINES:
- Remember previous symptoms mentioned by the patient
- Reference earlier parts of the conversation when relevant
- Ask about symptom progression if the patient returns to discuss the same issue
- Track medication or treatment recommendations you've previously suggested

IMPORTANT RULES:
- Never diagnose definitively - only suggest possibilities
- Always clarify you are an AI assistant, not a replacement for in-person medical care
- For emergencies, direct patients to emergency services immediately
- Be particularly cautious with children, pregnant women, elderly patients
- Support both English and Indonesian languages fluently

If the patient speaks Indonesian, respond in Indonesian. If they speak English, \
respond in English.";

/// System instruction for the topic classifier.
const TOPIC_SYSTEM_PROMPT: &str = "\
You are a health topic classifier. Based on the conversation between a user and a \
health assistant, identify the main health topic being discussed. Return ONLY the \
topic name in Indonesian (2-5 words), with no additional text, explanation or \
punctuation. For example: \"Perawatan Kulit Wajah\" or \"Manajemen Nyeri Kepala\".";

/// Sampling for the main reply.
const REPLY_TEMPERATURE: f32 = 0.7;
const REPLY_MAX_TOKENS: u32 = 1000;

/// Sampling for the topic label: low temperature, tiny output budget.
const TOPIC_TEMPERATURE: f32 = 0.3;
const TOPIC_MAX_TOKENS: u32 = 10;

/// Punctuation stripped from topic labels.
const TOPIC_STRIP_CHARS: &[char] = &['"', '\'', '.', ',', ':', ';', '!', '?'];

/// Reply from the health-support chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportReply {
    pub message: String,
    pub topic: String,
}

/// Service for the stateless health-support chat.
pub struct SupportService {
    completion: Arc<ResilientCompletionClient>,
}

impl SupportService {
    pub fn new(completion: Arc<ResilientCompletionClient>) -> Self {
        Self { completion }
    }

    /// Produces an assistant reply plus a short topic label.
    ///
    /// Never fails: the reply degrades to a fallback message and the topic
    /// to [`DEFAULT_TOPIC`].
    pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> SupportReply {
        let reply = self.generate_reply(message, history).await;
        let topic = self.extract_topic(message, history, &reply).await;

        SupportReply {
            message: reply,
            topic,
        }
    }

    async fn generate_reply(&self, message: &str, history: &[ChatTurn]) -> String {
        let mut request = CompletionRequest::new()
            .with_system(SUPPORT_SYSTEM_PROMPT)
            .with_temperature(REPLY_TEMPERATURE)
            .with_max_tokens(REPLY_MAX_TOKENS);

        // Soft context from the keyword heuristic, when it found anything.
        if let Some(summary) = analyze_history(history).summary() {
            request = request.with_message(
                ChatRole::System,
                format!("PATIENT CONTEXT: {}", summary),
            );
        }

        for turn in history {
            request = request.with_message(turn.role.into(), turn.content.clone());
        }
        request = request.with_message(ChatRole::User, message);

        self.completion.complete_with_fallback(request).await
    }

    /// Second completion call constrained to a short, low-temperature
    /// label; any failure falls back to the fixed default.
    async fn extract_topic(&self, message: &str, history: &[ChatTurn], reply: &str) -> String {
        let conversation = history
            .iter()
            .map(|turn| {
                let speaker = match turn.role {
                    MessageRole::User => "User",
                    MessageRole::Assistant => "AI",
                };
                format!("{}: {}", speaker, turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let request = CompletionRequest::new()
            .with_system(TOPIC_SYSTEM_PROMPT)
            .with_temperature(TOPIC_TEMPERATURE)
            .with_max_tokens(TOPIC_MAX_TOKENS)
            .with_message(
                ChatRole::User,
                format!(
                    "User's latest message: \"{}\"\n\nAI's latest response: \"{}\"\n\nPrevious conversation: {}",
                    message, reply, conversation
                ),
            );

        match self.completion.complete_once(request).await {
            Ok(response) => {
                let topic: String = response
                    .content
                    .chars()
                    .filter(|c| !TOPIC_STRIP_CHARS.contains(c))
                    .collect();
                let topic = topic.trim().to_string();
                if topic.is_empty() {
                    DEFAULT_TOPIC.to_string()
                } else {
                    topic
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Topic extraction failed, using default");
                DEFAULT_TOPIC.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCompletionClient;
    use crate::ports::CompletionError;
    use std::time::Duration;

    struct Fixture {
        service: SupportService,
        mock: Arc<MockCompletionClient>,
    }

    fn fixture(mock: MockCompletionClient) -> Fixture {
        let mock = Arc::new(mock);
        let completion = Arc::new(
            ResilientCompletionClient::new(mock.clone(), 3)
                .with_base_delay(Duration::from_millis(1)),
        );
        Fixture {
            service: SupportService::new(completion),
            mock,
        }
    }

    #[tokio::test]
    async fn chat_returns_reply_and_cleaned_topic() {
        let mock = MockCompletionClient::new();
        mock.push_reply("Minum air putih dan istirahat yang cukup.");
        mock.push_reply("\"Manajemen Nyeri Kepala.\"");
        let f = fixture(mock);

        let reply = f.service.chat("kepala saya pusing", &[]).await;

        assert_eq!(reply.message, "Minum air putih dan istirahat yang cukup.");
        assert_eq!(reply.topic, "Manajemen Nyeri Kepala");
    }

    #[tokio::test]
    async fn topic_failure_falls_back_to_default_label() {
        let mock = MockCompletionClient::new();
        mock.push_reply("Here is some advice.");
        mock.push_error(CompletionError::network("down"));
        let f = fixture(mock);

        let reply = f.service.chat("I feel dizzy", &[]).await;

        assert_eq!(reply.message, "Here is some advice.");
        assert_eq!(reply.topic, DEFAULT_TOPIC);
    }

    #[tokio::test]
    async fn empty_topic_falls_back_to_default_label() {
        let mock = MockCompletionClient::new();
        mock.push_reply("Advice.");
        mock.push_reply("\"...\"");
        let f = fixture(mock);

        let reply = f.service.chat("hello", &[]).await;
        assert_eq!(reply.topic, DEFAULT_TOPIC);
    }

    #[tokio::test]
    async fn keyword_context_is_injected_as_second_system_turn() {
        let mock = MockCompletionClient::returning("ok");
        let f = fixture(mock);

        let history = vec![ChatTurn::user("demam parah sejak tiga hari")];
        f.service.chat("masih demam", &history).await;

        let requests = f.mock.requests();
        let reply_request = &requests[0];
        assert_eq!(reply_request.system.as_deref(), Some(SUPPORT_SYSTEM_PROMPT));
        assert_eq!(reply_request.messages[0].role, ChatRole::System);
        assert!(reply_request.messages[0].content.starts_with("PATIENT CONTEXT:"));
    }

    #[tokio::test]
    async fn history_precedes_the_new_user_message() {
        let mock = MockCompletionClient::returning("ok");
        let f = fixture(mock);

        let history = vec![
            ChatTurn::user("I have a rash"),
            ChatTurn::assistant("Where is it located?"),
        ];
        f.service.chat("On my arm", &history).await;

        let requests = f.mock.requests();
        let messages = &requests[0].messages;
        let last = messages.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, "On my arm");

        let rash_pos = messages.iter().position(|m| m.content == "I have a rash").unwrap();
        let arm_pos = messages.iter().position(|m| m.content == "On my arm").unwrap();
        assert!(rash_pos < arm_pos);
    }

    #[tokio::test]
    async fn topic_request_uses_low_temperature_and_tiny_budget() {
        let mock = MockCompletionClient::returning("Kesehatan Kulit");
        let f = fixture(mock);

        f.service.chat("my skin itches", &[]).await;

        let requests = f.mock.requests();
        assert_eq!(requests.len(), 2);
        let topic_request = &requests[1];
        assert_eq!(topic_request.temperature, Some(TOPIC_TEMPERATURE));
        assert_eq!(topic_request.max_tokens, Some(TOPIC_MAX_TOKENS));
    }

    #[tokio::test]
    async fn reply_failure_still_produces_both_fields() {
        let mock = MockCompletionClient::new();
        // Reply path: initial + 3 retries all fail. Topic path: one failure.
        for _ in 0..5 {
            mock.push_error(CompletionError::network("down"));
        }
        let f = fixture(mock);

        let reply = f.service.chat("anyone there?", &[]).await;
        assert!(!reply.message.is_empty());
        assert_eq!(reply.topic, DEFAULT_TOPIC);
    }
}

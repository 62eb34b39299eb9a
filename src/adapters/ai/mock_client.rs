//! Mock completion client for tests.
//!
//! Scripted via an ordered queue of replies and errors; once the queue is
//! drained, falls back to a default reply when one was configured. Records
//! every request for assertions.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{
    CompletionClient, CompletionError, CompletionRequest, CompletionResponse,
};

/// Model name reported by mock responses.
const MOCK_MODEL: &str = "mock-model";

/// Scriptable in-memory CompletionClient.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    default_reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionClient {
    /// Creates a mock with an empty script and no default reply.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that answers every request with the same text.
    pub fn returning(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues one successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queues one failure.
    pub fn push_error(&self, error: CompletionError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copies of every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().unwrap().push(request);

        let scripted = self.script.lock().unwrap().pop_front();
        let content = match scripted {
            Some(result) => result?,
            None => match &self.default_reply {
                Some(reply) => reply.clone(),
                None => {
                    return Err(CompletionError::parse(
                        "MockCompletionClient script exhausted",
                    ))
                }
            },
        };

        Ok(CompletionResponse {
            content,
            model: MOCK_MODEL.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatRole;

    #[tokio::test]
    async fn scripted_results_come_back_in_order() {
        let mock = MockCompletionClient::new();
        mock.push_reply("first");
        mock.push_error(CompletionError::network("down"));
        mock.push_reply("second");

        assert_eq!(
            mock.complete(CompletionRequest::new()).await.unwrap().content,
            "first"
        );
        assert!(mock.complete(CompletionRequest::new()).await.is_err());
        assert_eq!(
            mock.complete(CompletionRequest::new()).await.unwrap().content,
            "second"
        );
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn default_reply_answers_after_script_drains() {
        let mock = MockCompletionClient::returning("always this");
        assert_eq!(
            mock.complete(CompletionRequest::new()).await.unwrap().content,
            "always this"
        );
        assert_eq!(
            mock.complete(CompletionRequest::new()).await.unwrap().content,
            "always this"
        );
    }

    #[tokio::test]
    async fn exhausted_script_without_default_is_an_error() {
        let mock = MockCompletionClient::new();
        assert!(mock.complete(CompletionRequest::new()).await.is_err());
    }

    #[tokio::test]
    async fn requests_are_recorded_for_assertions() {
        let mock = MockCompletionClient::returning("ok");
        let request = CompletionRequest::new()
            .with_system("sys")
            .with_message(ChatRole::User, "hello");
        mock.complete(request).await.unwrap();

        let seen = mock.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system, Some("sys".to_string()));
        assert_eq!(seen[0].messages[0].content, "hello");
    }
}

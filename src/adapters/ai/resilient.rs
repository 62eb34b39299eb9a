//! Resilience wrapper around any CompletionClient.
//!
//! Separates retry/backoff and fallback policy from provider-call code: the
//! inner client does one request; this wrapper retries transient failures
//! with exponential backoff and, when every attempt fails, degrades to a
//! safe fallback message differentiated by error class. A clinical-context
//! chat must never dead-end, so `complete_with_fallback` cannot fail.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    CompletionClient, CompletionError, CompletionRequest, CompletionResponse,
};

/// Fallback when the provider cannot be reached at all.
pub const CONNECTION_FALLBACK: &str =
    "Unable to connect to the health support service. Please check your internet connection and try again later.";

/// Fallback when the provider is reachable but too slow.
pub const TIMEOUT_FALLBACK: &str =
    "The health support service is taking too long to respond. Please try again later.";

/// Fallback when our credentials are rejected.
pub const AUTH_FALLBACK: &str =
    "Authentication with the health support service failed. Please contact support.";

/// Fallback for every other failure class.
pub const GENERIC_FALLBACK: &str =
    "I apologize, but I am unable to respond at the moment. Please try again later.";

/// Default backoff base: 2s, doubling per attempt.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Retry/backoff + fallback wrapper for completion clients.
pub struct ResilientCompletionClient {
    inner: Arc<dyn CompletionClient>,
    max_retries: u32,
    base_delay: Duration,
}

impl ResilientCompletionClient {
    /// Wraps a client with the given retry cap and the default 2s backoff base.
    pub fn new(inner: Arc<dyn CompletionClient>, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Overrides the backoff base delay (tests use a tiny one).
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Backoff before the given 1-based attempt: base * 2^(attempt-1).
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Single attempt against the inner client, no retries.
    ///
    /// For low-stakes secondary calls (topic labels) where the caller has
    /// its own cheap fallback and waiting out a backoff is not worth it.
    pub async fn complete_once(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.inner.complete(request).await
    }

    /// Completes with retries, then degrades to a safe fallback message.
    ///
    /// The returned text is either generated content or one of the fallback
    /// constants - never an error.
    pub async fn complete_with_fallback(&self, request: CompletionRequest) -> String {
        match self.complete(request).await {
            Ok(response) => response.content,
            Err(err) => {
                tracing::error!(error = %err, "Completion failed after retries, using fallback");
                fallback_for(&err).to_string()
            }
        }
    }
}

#[async_trait]
impl CompletionClient for ResilientCompletionClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let mut attempt = 0u32;

        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    attempt += 1;
                    if !err.is_retryable() || attempt > self.max_retries {
                        return Err(err);
                    }

                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        error = %err,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Completion attempt failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Picks the user-facing fallback message for an error class.
fn fallback_for(err: &CompletionError) -> &'static str {
    match err {
        CompletionError::ConnectionFailed(_) => CONNECTION_FALLBACK,
        CompletionError::Timeout { .. } => TIMEOUT_FALLBACK,
        CompletionError::AuthenticationFailed => AUTH_FALLBACK,
        _ => GENERIC_FALLBACK,
    }
}

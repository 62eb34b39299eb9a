//! HTTP handlers for the health-support chat.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::SupportService;

use super::dto::{ChatRequest, ChatResponse};

/// Shared state for support handlers.
#[derive(Clone)]
pub struct SupportHandlers {
    support: Arc<SupportService>,
}

impl SupportHandlers {
    pub fn new(support: Arc<SupportService>) -> Self {
        Self { support }
    }
}

/// POST /health-support/chat - Stateless chat turn with topic label.
///
/// Cannot fail on the provider side: the service degrades to fallback
/// text, so this handler only rejects unauthenticated callers.
pub async fn chat(
    State(handlers): State<SupportHandlers>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    tracing::info!(user_id = %user.id, "Health support chat turn");

    let reply = handlers
        .support
        .chat(&request.message, &request.history)
        .await;

    Ok(Json(reply.into()))
}

//! HTTP routes for the health-support chat.

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::application::SupportService;

use super::handlers::{chat, SupportHandlers};

/// Creates the health-support router.
pub fn support_routes(support: Arc<SupportService>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(SupportHandlers::new(support))
}

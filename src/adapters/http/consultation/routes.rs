//! HTTP routes for consultation endpoints.

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::application::ConsultationService;

use super::handlers::{
    add_message, create_consultation, end_consultation, get_consultation, list_consultations,
    start_consultation, update_notes, ConsultationHandlers,
};

/// Creates the consultation router with all endpoints.
pub fn consultation_routes(consultations: Arc<ConsultationService>) -> Router {
    Router::new()
        .route("/", get(list_consultations))
        .route("/", post(create_consultation))
        .route("/:id", get(get_consultation))
        .route("/:id/start", post(start_consultation))
        .route("/:id/end", post(end_consultation))
        .route("/:id/messages", post(add_message))
        .route("/:id/notes", patch(update_notes))
        .with_state(ConsultationHandlers::new(consultations))
}

//! HTTP handlers for consultation endpoints. All routes are owner-scoped
//! through the bearer token.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::ConsultationService;
use crate::domain::foundation::{ConsultationId, DoctorId};

use super::dto::{
    AddMessageRequest, ConsultationDetailResponse, ConsultationResponse,
    CreateConsultationRequest, MessageResponse, UpdateNotesRequest,
};

/// Shared state for consultation handlers.
#[derive(Clone)]
pub struct ConsultationHandlers {
    consultations: Arc<ConsultationService>,
}

impl ConsultationHandlers {
    pub fn new(consultations: Arc<ConsultationService>) -> Self {
        Self { consultations }
    }
}

/// GET /consultations - The caller's consultations, newest first.
pub async fn list_consultations(
    State(handlers): State<ConsultationHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ConsultationResponse>>, ApiError> {
    let consultations = handlers.consultations.list_for_user(user.id).await?;
    Ok(Json(
        consultations
            .into_iter()
            .map(ConsultationResponse::from)
            .collect(),
    ))
}

/// GET /consultations/:id - Full detail with transcript, owner only.
pub async fn get_consultation(
    State(handlers): State<ConsultationHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<ConsultationDetailResponse>, ApiError> {
    let detail = handlers
        .consultations
        .get_detail(ConsultationId::from_i64(id), user.id)
        .await?;
    Ok(Json(detail.into()))
}

/// POST /consultations - Create a pending consultation.
pub async fn create_consultation(
    State(handlers): State<ConsultationHandlers>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<ConsultationResponse>), ApiError> {
    let created = handlers
        .consultations
        .create(user.id, DoctorId::from_i64(request.doctor_id))
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// POST /consultations/:id/start - pending -> active.
pub async fn start_consultation(
    State(handlers): State<ConsultationHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<ConsultationResponse>, ApiError> {
    let consultation = handlers
        .consultations
        .start(ConsultationId::from_i64(id))
        .await?;
    Ok(Json(ConsultationResponse::from(&consultation)))
}

/// POST /consultations/:id/end - active -> completed.
pub async fn end_consultation(
    State(handlers): State<ConsultationHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<ConsultationResponse>, ApiError> {
    let consultation = handlers
        .consultations
        .end(ConsultationId::from_i64(id))
        .await?;
    Ok(Json(ConsultationResponse::from(&consultation)))
}

/// POST /consultations/:id/messages - Append a patient turn, returning the
/// persisted assistant reply.
pub async fn add_message(
    State(handlers): State<ConsultationHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<AddMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = handlers
        .consultations
        .append_user_turn(ConsultationId::from_i64(id), &request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

/// PATCH /consultations/:id/notes - Overwrite the owner's notes.
pub async fn update_notes(
    State(handlers): State<ConsultationHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<Json<ConsultationResponse>, ApiError> {
    let consultation = handlers
        .consultations
        .update_notes(ConsultationId::from_i64(id), &request.notes, user.id)
        .await?;
    Ok(Json(ConsultationResponse::from(&consultation)))
}

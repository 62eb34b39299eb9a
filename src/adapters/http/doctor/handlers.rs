//! HTTP handlers for doctor endpoints.
//!
//! Reads are public; mutations require an authenticated caller.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::DirectoryService;
use crate::domain::foundation::DoctorId;

use super::dto::{CreateDoctorRequest, DoctorResponse, UpdateDoctorRequest};

/// Shared state for doctor handlers.
#[derive(Clone)]
pub struct DoctorHandlers {
    directory: Arc<DirectoryService>,
}

impl DoctorHandlers {
    pub fn new(directory: Arc<DirectoryService>) -> Self {
        Self { directory }
    }
}

/// GET /doctors - List all doctors.
pub async fn list_doctors(
    State(handlers): State<DoctorHandlers>,
) -> Result<Json<Vec<DoctorResponse>>, ApiError> {
    let doctors = handlers.directory.list().await?;
    Ok(Json(doctors.into_iter().map(DoctorResponse::from).collect()))
}

/// GET /doctors/:id - One doctor, or null when absent.
pub async fn get_doctor(
    State(handlers): State<DoctorHandlers>,
    Path(id): Path<i64>,
) -> Result<Json<Option<DoctorResponse>>, ApiError> {
    let doctor = handlers.directory.get(DoctorId::from_i64(id)).await?;
    Ok(Json(doctor.map(DoctorResponse::from)))
}

/// POST /doctors - Create a doctor.
pub async fn create_doctor(
    State(handlers): State<DoctorHandlers>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<DoctorResponse>), ApiError> {
    let doctor = handlers.directory.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(doctor.into())))
}

/// PUT /doctors/:id - Partially update a doctor.
pub async fn update_doctor(
    State(handlers): State<DoctorHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let doctor = handlers
        .directory
        .update(DoctorId::from_i64(id), request.into())
        .await?;
    Ok(Json(doctor.into()))
}

/// DELETE /doctors/:id - Delete a doctor, returning the deleted record.
pub async fn delete_doctor(
    State(handlers): State<DoctorHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let doctor = handlers.directory.delete(DoctorId::from_i64(id)).await?;
    Ok(Json(doctor.into()))
}

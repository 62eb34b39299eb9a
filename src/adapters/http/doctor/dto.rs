//! HTTP DTOs for doctor endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::doctor::{Doctor, DoctorUpdate, NewDoctor};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a doctor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub experience: i32,
    pub rating: f64,
    pub bio: String,
    pub photo_url: Option<String>,
}

impl From<CreateDoctorRequest> for NewDoctor {
    fn from(request: CreateDoctorRequest) -> Self {
        Self {
            name: request.name,
            specialization: request.specialization,
            experience: request.experience,
            rating: request.rating,
            bio: request.bio,
            photo_url: request.photo_url,
        }
    }
}

/// Request to partially update a doctor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<i32>,
    pub rating: Option<f64>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub is_available: Option<bool>,
}

impl From<UpdateDoctorRequest> for DoctorUpdate {
    fn from(request: UpdateDoctorRequest) -> Self {
        Self {
            name: request.name,
            specialization: request.specialization,
            experience: request.experience,
            rating: request.rating,
            bio: request.bio,
            photo_url: request.photo_url,
            is_available: request.is_available,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Doctor record as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub experience: i32,
    pub rating: f64,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub is_available: bool,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id.as_i64(),
            name: doctor.name,
            specialization: doctor.specialization,
            experience: doctor.experience,
            rating: doctor.rating,
            bio: doctor.bio,
            photo_url: doctor.photo_url,
            is_available: doctor.is_available,
        }
    }
}

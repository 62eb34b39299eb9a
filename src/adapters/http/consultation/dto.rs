//! HTTP DTOs for consultation endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::doctor::dto::DoctorResponse;
use crate::application::{ConsultationDetail, ConsultationWithDoctor};
use crate::domain::consultation::{Consultation, ConsultationStatus, Message, MessageRole};
use crate::domain::identity::UserProfile;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a consultation with a chosen doctor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationRequest {
    pub doctor_id: i64,
}

/// Request to append a patient message.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMessageRequest {
    pub message: String,
}

/// Request to overwrite the owner's notes.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Consultation record, optionally with doctor attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub id: i64,
    pub user_id: i64,
    pub doctor_id: i64,
    pub status: ConsultationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorResponse>,
}

impl From<&Consultation> for ConsultationResponse {
    fn from(consultation: &Consultation) -> Self {
        Self {
            id: consultation.id().as_i64(),
            user_id: consultation.user_id().as_i64(),
            doctor_id: consultation.doctor_id().as_i64(),
            status: consultation.status(),
            notes: consultation.notes().map(String::from),
            created_at: consultation.created_at().as_datetime().to_rfc3339(),
            started_at: consultation
                .started_at()
                .map(|t| t.as_datetime().to_rfc3339()),
            ended_at: consultation.ended_at().map(|t| t.as_datetime().to_rfc3339()),
            doctor: None,
        }
    }
}

impl From<ConsultationWithDoctor> for ConsultationResponse {
    fn from(with_doctor: ConsultationWithDoctor) -> Self {
        let mut response = Self::from(&with_doctor.consultation);
        response.doctor = Some(with_doctor.doctor.into());
        response
    }
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    pub consultation_id: i64,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.as_i64(),
            consultation_id: message.consultation_id.as_i64(),
            role: message.role,
            content: message.content,
            timestamp: message.timestamp.as_datetime().to_rfc3339(),
        }
    }
}

/// Patient identity attached to a consultation detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

impl From<UserProfile> for PatientResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.as_i64(),
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            date_of_birth: profile.date_of_birth.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Full owner-only view: consultation, doctor, patient, transcript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDetailResponse {
    #[serde(flatten)]
    pub consultation: ConsultationResponse,
    pub patient: PatientResponse,
    pub messages: Vec<MessageResponse>,
}

impl From<ConsultationDetail> for ConsultationDetailResponse {
    fn from(detail: ConsultationDetail) -> Self {
        let mut consultation = ConsultationResponse::from(&detail.consultation);
        consultation.doctor = Some(detail.doctor.into());

        Self {
            consultation,
            patient: detail.patient.into(),
            messages: detail.transcript.into_iter().map(MessageResponse::from).collect(),
        }
    }
}

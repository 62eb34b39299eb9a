//! ConsultationService - lifecycle, ownership checks, and the AI-turn
//! orchestration at the core of the system.

use std::sync::Arc;

use chrono::Utc;

use crate::adapters::ai::ResilientCompletionClient;
use crate::domain::consultation::{
    prompt, Consultation, Message, MessageRole, Transition, END_TAG,
};
use crate::domain::doctor::Doctor;
use crate::domain::foundation::{
    ConsultationId, DoctorId, DomainError, ErrorCode, Timestamp, UserId,
};
use crate::domain::identity::UserProfile;
use crate::ports::{CompletionRequest, ConsultationRepository, DoctorRepository, UserRepository};

use super::turn_lock::TurnLocks;

/// A consultation with its doctor profile attached.
#[derive(Debug, Clone)]
pub struct ConsultationWithDoctor {
    pub consultation: Consultation,
    pub doctor: Doctor,
}

/// Full consultation detail: doctor, patient, and ordered transcript.
#[derive(Debug, Clone)]
pub struct ConsultationDetail {
    pub consultation: Consultation,
    pub doctor: Doctor,
    pub patient: UserProfile,
    pub transcript: Vec<Message>,
}

/// Service owning the consultation lifecycle and message log.
pub struct ConsultationService {
    consultations: Arc<dyn ConsultationRepository>,
    doctors: Arc<dyn DoctorRepository>,
    users: Arc<dyn UserRepository>,
    completion: Arc<ResilientCompletionClient>,
    turn_locks: TurnLocks,
}

impl ConsultationService {
    pub fn new(
        consultations: Arc<dyn ConsultationRepository>,
        doctors: Arc<dyn DoctorRepository>,
        users: Arc<dyn UserRepository>,
        completion: Arc<ResilientCompletionClient>,
    ) -> Self {
        Self {
            consultations,
            doctors,
            users,
            completion,
            turn_locks: TurnLocks::new(),
        }
    }

    /// Creates a pending consultation for the user with the chosen doctor.
    ///
    /// # Errors
    ///
    /// - `DoctorNotFound` if the doctor does not exist
    pub async fn create(
        &self,
        user_id: UserId,
        doctor_id: DoctorId,
    ) -> Result<ConsultationWithDoctor, DomainError> {
        let doctor = self.load_doctor(doctor_id).await?;
        let consultation = self.consultations.insert(user_id, doctor_id).await?;

        tracing::info!(
            consultation_id = %consultation.id(),
            user_id = %user_id,
            doctor_id = %doctor_id,
            "Consultation created"
        );

        Ok(ConsultationWithDoctor {
            consultation,
            doctor,
        })
    }

    /// All consultations owned by the user, newest first, doctors attached.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ConsultationWithDoctor>, DomainError> {
        let consultations = self.consultations.list_for_user(user_id).await?;

        let mut result = Vec::with_capacity(consultations.len());
        for consultation in consultations {
            let doctor = self.load_doctor(consultation.doctor_id()).await?;
            result.push(ConsultationWithDoctor {
                consultation,
                doctor,
            });
        }
        Ok(result)
    }

    /// Loads a consultation with doctor, patient, and full transcript.
    ///
    /// # Errors
    ///
    /// - `ConsultationNotFound` if missing
    /// - `Forbidden` if `requesting_user` is not the owner - without
    ///   leaking any transcript content
    pub async fn get_detail(
        &self,
        id: ConsultationId,
        requesting_user: UserId,
    ) -> Result<ConsultationDetail, DomainError> {
        let consultation = self.load(id).await?;

        if !consultation.is_owned_by(requesting_user) {
            return Err(forbidden());
        }

        let doctor = self.load_doctor(consultation.doctor_id()).await?;
        let patient = self.load_patient(consultation.user_id()).await?;
        let transcript = self.consultations.transcript(id).await?;

        Ok(ConsultationDetail {
            consultation,
            doctor,
            patient,
            transcript,
        })
    }

    /// Starts a consultation: pending -> active, stamping `started_at`.
    /// Re-starting an active consultation is a no-op.
    pub async fn start(&self, id: ConsultationId) -> Result<Consultation, DomainError> {
        let mut consultation = self.load(id).await?;

        if consultation.start(Timestamp::now())? == Transition::Applied {
            self.consultations.update(&consultation).await?;
            tracing::info!(consultation_id = %id, "Consultation started");
        }

        Ok(consultation)
    }

    /// Ends a consultation: active -> completed, stamping `ended_at`.
    /// Re-ending a completed consultation is a no-op.
    pub async fn end(&self, id: ConsultationId) -> Result<Consultation, DomainError> {
        let mut consultation = self.load(id).await?;

        if consultation.end(Timestamp::now())? == Transition::Applied {
            self.consultations.update(&consultation).await?;
            tracing::info!(consultation_id = %id, "Consultation ended");
        }

        Ok(consultation)
    }

    /// Appends a patient turn and produces the assistant reply.
    ///
    /// Serialized per consultation: racing turns queue behind the turn
    /// lock, so the provider always sees a transcript whose last entry is
    /// the turn being answered.
    ///
    /// The transcript is reloaded after persisting the user message; the
    /// completion call must see a transcript whose last entry is the new
    /// user turn. The completion goes through the resilience wrapper and always
    /// yields some text; provider failure is absorbed into a fallback
    /// message, never surfaced to the patient.
    ///
    /// # Errors
    ///
    /// - `ConsultationNotFound` if missing
    /// - `ConsultationNotActive` if status is not active (no message is
    ///   appended)
    pub async fn append_user_turn(
        &self,
        id: ConsultationId,
        text: &str,
    ) -> Result<Message, DomainError> {
        let _turn_guard = self.turn_locks.acquire(id).await;

        let consultation = self.load(id).await?;
        consultation.ensure_active()?;

        let doctor = self.load_doctor(consultation.doctor_id()).await?;
        let patient = self.load_patient(consultation.user_id()).await?;

        self.consultations
            .append_message(id, MessageRole::User, text)
            .await?;

        let transcript = self.consultations.transcript(id).await?;

        let built = prompt::build(&doctor, &patient, &transcript, Utc::now().date_naive());
        let mut request = CompletionRequest::new()
            .with_system(built.system)
            .with_stop(END_TAG);
        for turn in built.turns {
            request = request.with_message(turn.role.into(), turn.content);
        }

        let reply = self.completion.complete_with_fallback(request).await;

        let message = self
            .consultations
            .append_message(id, MessageRole::Assistant, &reply)
            .await?;

        tracing::info!(
            consultation_id = %id,
            message_id = %message.id,
            "Assistant turn persisted"
        );

        Ok(message)
    }

    /// Overwrites the owner's notes.
    ///
    /// # Errors
    ///
    /// - `Forbidden` when the requester is not the owner - including when
    ///   the consultation does not exist, so existence is never leaked on
    ///   a mismatch
    pub async fn update_notes(
        &self,
        id: ConsultationId,
        notes: &str,
        requesting_user: UserId,
    ) -> Result<Consultation, DomainError> {
        let mut consultation = match self.consultations.find_by_id(id).await? {
            Some(c) if c.is_owned_by(requesting_user) => c,
            // Missing and non-owned collapse into the same answer.
            _ => return Err(forbidden()),
        };

        consultation.set_notes(notes);
        self.consultations.update(&consultation).await?;
        Ok(consultation)
    }

    async fn load(&self, id: ConsultationId) -> Result<Consultation, DomainError> {
        self.consultations.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::ConsultationNotFound,
                format!("Consultation not found: {}", id),
            )
        })
    }

    async fn load_doctor(&self, id: DoctorId) -> Result<Doctor, DomainError> {
        self.doctors.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::DoctorNotFound, format!("Doctor not found: {}", id))
        })
    }

    async fn load_patient(&self, id: UserId) -> Result<UserProfile, DomainError> {
        Ok(self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", id))
            })?
            .into_profile())
    }
}

fn forbidden() -> DomainError {
    DomainError::new(
        ErrorCode::Forbidden,
        "You do not have access to this consultation",
    )
}

//! ConsultationRepository port - persistence for consultations and their
//! append-only transcripts.

use async_trait::async_trait;

use crate::domain::consultation::{Consultation, Message, MessageRole};
use crate::domain::foundation::{ConsultationId, DoctorId, DomainError, UserId};

/// Port for consultation persistence.
#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    /// Inserts a new pending consultation; the store assigns the id.
    async fn insert(
        &self,
        user_id: UserId,
        doctor_id: DoctorId,
    ) -> Result<Consultation, DomainError>;

    /// Looks a consultation up by id.
    async fn find_by_id(&self, id: ConsultationId)
        -> Result<Option<Consultation>, DomainError>;

    /// All consultations owned by the user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Consultation>, DomainError>;

    /// Persists the mutable consultation fields (status, timestamps, notes).
    ///
    /// # Errors
    ///
    /// - `ConsultationNotFound` if the record disappeared
    async fn update(&self, consultation: &Consultation) -> Result<(), DomainError>;

    /// Loads the full transcript, ordered by timestamp ascending.
    async fn transcript(&self, id: ConsultationId) -> Result<Vec<Message>, DomainError>;

    /// Appends one message to the transcript and returns the stored entry.
    async fn append_message(
        &self,
        id: ConsultationId,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, DomainError>;
}

//! Consultation aggregate and its lifecycle state machine.
//!
//! A consultation is created `Pending`, explicitly started into `Active`,
//! and explicitly ended into `Completed` (terminal). No transition skips a
//! state. Message appends are only legal while `Active`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    ConsultationId, DoctorId, DomainError, ErrorCode, Timestamp, UserId,
};

/// Lifecycle state of a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    /// Created, not yet started.
    Pending,
    /// In progress - the only state that accepts message appends.
    Active,
    /// Ended. Terminal.
    Completed,
}

impl ConsultationStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Active => "active",
            ConsultationStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConsultationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConsultationStatus::Pending),
            "active" => Ok(ConsultationStatus::Active),
            "completed" => Ok(ConsultationStatus::Completed),
            other => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Unknown consultation status: {}", other),
            )),
        }
    }
}

/// Outcome of a lifecycle transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed and must be persisted.
    Applied,
    /// The consultation was already in the requested state; nothing to write.
    AlreadyThere,
}

/// Consultation aggregate.
///
/// # Invariants
///
/// - `started_at` is set exactly when the consultation first becomes Active
/// - `ended_at` is set exactly when it first becomes Completed
/// - only the owning user may read or annotate the consultation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultation {
    id: ConsultationId,
    user_id: UserId,
    doctor_id: DoctorId,
    status: ConsultationStatus,
    notes: Option<String>,
    created_at: Timestamp,
    started_at: Option<Timestamp>,
    ended_at: Option<Timestamp>,
}

impl Consultation {
    /// Reconstitute a consultation from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ConsultationId,
        user_id: UserId,
        doctor_id: DoctorId,
        status: ConsultationStatus,
        notes: Option<String>,
        created_at: Timestamp,
        started_at: Option<Timestamp>,
        ended_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            user_id,
            doctor_id,
            status,
            notes,
            created_at,
            started_at,
            ended_at,
        }
    }

    pub fn id(&self) -> ConsultationId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn doctor_id(&self) -> DoctorId {
        self.doctor_id
    }

    pub fn status(&self) -> ConsultationStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    /// True when `user_id` owns this consultation.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Starts the consultation.
    ///
    /// Status is re-validated here rather than relying on store side
    /// effects: an already-active consultation is accepted as a no-op, a
    /// completed one is rejected.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the consultation is Completed
    pub fn start(&mut self, now: Timestamp) -> Result<Transition, DomainError> {
        match self.status {
            ConsultationStatus::Pending => {
                self.status = ConsultationStatus::Active;
                self.started_at = Some(now);
                Ok(Transition::Applied)
            }
            ConsultationStatus::Active => Ok(Transition::AlreadyThere),
            ConsultationStatus::Completed => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cannot start a completed consultation",
            )),
        }
    }

    /// Ends the consultation.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the consultation is still Pending
    ///   (ending would skip the Active state)
    pub fn end(&mut self, now: Timestamp) -> Result<Transition, DomainError> {
        match self.status {
            ConsultationStatus::Active => {
                self.status = ConsultationStatus::Completed;
                self.ended_at = Some(now);
                Ok(Transition::Applied)
            }
            ConsultationStatus::Completed => Ok(Transition::AlreadyThere),
            ConsultationStatus::Pending => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cannot end a consultation that was never started",
            )),
        }
    }

    /// Guards message appends: only Active consultations accept messages.
    ///
    /// # Errors
    ///
    /// - `ConsultationNotActive` otherwise
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.status != ConsultationStatus::Active {
            return Err(DomainError::new(
                ErrorCode::ConsultationNotActive,
                "Consultation must be active to add messages",
            ));
        }
        Ok(())
    }

    /// Overwrites the notes field.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = Some(notes.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_consultation() -> Consultation {
        Consultation::reconstitute(
            ConsultationId::from_i64(1),
            UserId::from_i64(1),
            DoctorId::from_i64(2),
            ConsultationStatus::Pending,
            None,
            Timestamp::now(),
            None,
            None,
        )
    }

    #[test]
    fn new_consultation_is_pending_without_timestamps() {
        let c = pending_consultation();
        assert_eq!(c.status(), ConsultationStatus::Pending);
        assert!(c.started_at().is_none());
        assert!(c.ended_at().is_none());
    }

    #[test]
    fn start_moves_pending_to_active_and_stamps() {
        let mut c = pending_consultation();
        let now = Timestamp::now();

        assert_eq!(c.start(now).unwrap(), Transition::Applied);
        assert_eq!(c.status(), ConsultationStatus::Active);
        assert_eq!(c.started_at(), Some(now));
    }

    #[test]
    fn start_is_idempotent_on_active() {
        let mut c = pending_consultation();
        let first = Timestamp::now();
        c.start(first).unwrap();

        let again = Timestamp::now();
        assert_eq!(c.start(again).unwrap(), Transition::AlreadyThere);
        // The original start timestamp is preserved.
        assert_eq!(c.started_at(), Some(first));
    }

    #[test]
    fn start_rejects_completed() {
        let mut c = pending_consultation();
        c.start(Timestamp::now()).unwrap();
        c.end(Timestamp::now()).unwrap();

        let err = c.start(Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn end_moves_active_to_completed_and_stamps() {
        let mut c = pending_consultation();
        c.start(Timestamp::now()).unwrap();

        let now = Timestamp::now();
        assert_eq!(c.end(now).unwrap(), Transition::Applied);
        assert_eq!(c.status(), ConsultationStatus::Completed);
        assert_eq!(c.ended_at(), Some(now));
    }

    #[test]
    fn end_is_idempotent_on_completed() {
        let mut c = pending_consultation();
        c.start(Timestamp::now()).unwrap();
        let first = Timestamp::now();
        c.end(first).unwrap();

        assert_eq!(c.end(Timestamp::now()).unwrap(), Transition::AlreadyThere);
        assert_eq!(c.ended_at(), Some(first));
    }

    #[test]
    fn end_rejects_pending() {
        let mut c = pending_consultation();
        let err = c.end(Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn ensure_active_guards_pending_and_completed() {
        let mut c = pending_consultation();
        assert_eq!(
            c.ensure_active().unwrap_err().code,
            ErrorCode::ConsultationNotActive
        );

        c.start(Timestamp::now()).unwrap();
        assert!(c.ensure_active().is_ok());

        c.end(Timestamp::now()).unwrap();
        assert_eq!(
            c.ensure_active().unwrap_err().code,
            ErrorCode::ConsultationNotActive
        );
    }

    #[test]
    fn ownership_check_compares_user_ids() {
        let c = pending_consultation();
        assert!(c.is_owned_by(UserId::from_i64(1)));
        assert!(!c.is_owned_by(UserId::from_i64(99)));
    }

    #[test]
    fn status_parses_storage_representation() {
        assert_eq!(
            "pending".parse::<ConsultationStatus>().unwrap(),
            ConsultationStatus::Pending
        );
        assert_eq!(
            "active".parse::<ConsultationStatus>().unwrap(),
            ConsultationStatus::Active
        );
        assert_eq!(
            "completed".parse::<ConsultationStatus>().unwrap(),
            ConsultationStatus::Completed
        );
        assert!("archived".parse::<ConsultationStatus>().is_err());
    }
}

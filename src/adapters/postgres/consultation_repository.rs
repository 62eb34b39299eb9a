//! PostgreSQL implementation of ConsultationRepository.
//!
//! Transcripts are read ordered by timestamp ascending; appends go through
//! `INSERT .. RETURNING` so the caller always sees the stored entry exactly
//! as persisted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::consultation::{Consultation, ConsultationStatus, Message, MessageRole};
use crate::domain::foundation::{
    ConsultationId, DoctorId, DomainError, ErrorCode, MessageId, Timestamp, UserId,
};
use crate::ports::ConsultationRepository;

use super::db_error;

/// PostgreSQL implementation of ConsultationRepository.
#[derive(Clone)]
pub struct PostgresConsultationRepository {
    pool: PgPool,
}

impl PostgresConsultationRepository {
    /// Creates a new PostgresConsultationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConsultationRepository for PostgresConsultationRepository {
    async fn insert(
        &self,
        user_id: UserId,
        doctor_id: DoctorId,
    ) -> Result<Consultation, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO consultations (user_id, doctor_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, user_id, doctor_id, status, notes, created_at, started_at, ended_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(doctor_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert consultation", e))?;

        row_to_consultation(row)
    }

    async fn find_by_id(
        &self,
        id: ConsultationId,
    ) -> Result<Option<Consultation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, doctor_id, status, notes, created_at, started_at, ended_at
            FROM consultations
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch consultation", e))?;

        row.map(row_to_consultation).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Consultation>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, doctor_id, status, notes, created_at, started_at, ended_at
            FROM consultations
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list consultations", e))?;

        rows.into_iter().map(row_to_consultation).collect()
    }

    async fn update(&self, consultation: &Consultation) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE consultations SET
                status = $2,
                notes = $3,
                started_at = $4,
                ended_at = $5
            WHERE id = $1
            "#,
        )
        .bind(consultation.id().as_i64())
        .bind(consultation.status().as_str())
        .bind(consultation.notes())
        .bind(consultation.started_at().map(|t| *t.as_datetime()))
        .bind(consultation.ended_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update consultation", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ConsultationNotFound,
                format!("Consultation not found: {}", consultation.id()),
            ));
        }

        Ok(())
    }

    async fn transcript(&self, id: ConsultationId) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, consultation_id, role, content, timestamp
            FROM messages
            WHERE consultation_id = $1
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load transcript", e))?;

        rows.into_iter().map(row_to_message).collect()
    }

    async fn append_message(
        &self,
        id: ConsultationId,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO messages (consultation_id, role, content)
            VALUES ($1, $2, $3)
            RETURNING id, consultation_id, role, content, timestamp
            "#,
        )
        .bind(id.as_i64())
        .bind(role.as_str())
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to append message", e))?;

        row_to_message(row)
    }
}

fn row_to_consultation(row: PgRow) -> Result<Consultation, DomainError> {
    let read = |e| db_error("Failed to read consultation row", e);

    let status: String = row.try_get("status").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let started_at: Option<DateTime<Utc>> = row.try_get("started_at").map_err(read)?;
    let ended_at: Option<DateTime<Utc>> = row.try_get("ended_at").map_err(read)?;

    Ok(Consultation::reconstitute(
        ConsultationId::from_i64(row.try_get("id").map_err(read)?),
        UserId::from_i64(row.try_get("user_id").map_err(read)?),
        DoctorId::from_i64(row.try_get("doctor_id").map_err(read)?),
        status.parse::<ConsultationStatus>()?,
        row.try_get("notes").map_err(read)?,
        Timestamp::from_datetime(created_at),
        started_at.map(Timestamp::from_datetime),
        ended_at.map(Timestamp::from_datetime),
    ))
}

fn row_to_message(row: PgRow) -> Result<Message, DomainError> {
    let read = |e| db_error("Failed to read message row", e);

    let role: String = row.try_get("role").map_err(read)?;
    let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(read)?;

    Ok(Message {
        id: MessageId::from_i64(row.try_get("id").map_err(read)?),
        consultation_id: ConsultationId::from_i64(row.try_get("consultation_id").map_err(read)?),
        role: role.parse::<MessageRole>()?,
        content: row.try_get("content").map_err(read)?,
        timestamp: Timestamp::from_datetime(timestamp),
    })
}

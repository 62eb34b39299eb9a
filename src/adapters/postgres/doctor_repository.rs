//! PostgreSQL implementation of DoctorRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::doctor::{Doctor, DoctorUpdate, NewDoctor};
use crate::domain::foundation::{DoctorId, DomainError, ErrorCode};
use crate::ports::DoctorRepository;

use super::db_error;

/// PostgreSQL implementation of DoctorRepository.
#[derive(Clone)]
pub struct PostgresDoctorRepository {
    pool: PgPool,
}

impl PostgresDoctorRepository {
    /// Creates a new PostgresDoctorRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for PostgresDoctorRepository {
    async fn list(&self) -> Result<Vec<Doctor>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, specialization, experience, rating, bio, photo_url, is_available
            FROM doctors
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list doctors", e))?;

        rows.into_iter().map(row_to_doctor).collect()
    }

    async fn find_by_id(&self, id: DoctorId) -> Result<Option<Doctor>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, specialization, experience, rating, bio, photo_url, is_available
            FROM doctors
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch doctor", e))?;

        row.map(row_to_doctor).transpose()
    }

    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO doctors (name, specialization, experience, rating, bio, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, specialization, experience, rating, bio, photo_url, is_available
            "#,
        )
        .bind(&doctor.name)
        .bind(&doctor.specialization)
        .bind(doctor.experience)
        .bind(doctor.rating)
        .bind(&doctor.bio)
        .bind(&doctor.photo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert doctor", e))?;

        row_to_doctor(row)
    }

    async fn update(&self, id: DoctorId, update: DoctorUpdate) -> Result<Doctor, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE doctors SET
                name = COALESCE($2, name),
                specialization = COALESCE($3, specialization),
                experience = COALESCE($4, experience),
                rating = COALESCE($5, rating),
                bio = COALESCE($6, bio),
                photo_url = COALESCE($7, photo_url),
                is_available = COALESCE($8, is_available)
            WHERE id = $1
            RETURNING id, name, specialization, experience, rating, bio, photo_url, is_available
            "#,
        )
        .bind(id.as_i64())
        .bind(update.name)
        .bind(update.specialization)
        .bind(update.experience)
        .bind(update.rating)
        .bind(update.bio)
        .bind(update.photo_url)
        .bind(update.is_available)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update doctor", e))?;

        match row {
            Some(row) => row_to_doctor(row),
            None => Err(doctor_not_found(id)),
        }
    }

    async fn delete(&self, id: DoctorId) -> Result<Doctor, DomainError> {
        let row = sqlx::query(
            r#"
            DELETE FROM doctors
            WHERE id = $1
            RETURNING id, name, specialization, experience, rating, bio, photo_url, is_available
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to delete doctor", e))?;

        match row {
            Some(row) => row_to_doctor(row),
            None => Err(doctor_not_found(id)),
        }
    }
}

fn doctor_not_found(id: DoctorId) -> DomainError {
    DomainError::new(ErrorCode::DoctorNotFound, format!("Doctor not found: {}", id))
}

fn row_to_doctor(row: PgRow) -> Result<Doctor, DomainError> {
    let read = |e| db_error("Failed to read doctor row", e);

    Ok(Doctor {
        id: DoctorId::from_i64(row.try_get("id").map_err(read)?),
        name: row.try_get("name").map_err(read)?,
        specialization: row.try_get("specialization").map_err(read)?,
        experience: row.try_get("experience").map_err(read)?,
        rating: row.try_get("rating").map_err(read)?,
        bio: row.try_get("bio").map_err(read)?,
        photo_url: row.try_get("photo_url").map_err(read)?,
        is_available: row.try_get("is_available").map_err(read)?,
    })
}

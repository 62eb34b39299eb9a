//! DirectoryService - CRUD over doctor profiles.
//!
//! No business rules beyond field presence; the service exists so the HTTP
//! boundary depends on one seam rather than the repository directly.

use std::sync::Arc;

use crate::domain::doctor::{Doctor, DoctorUpdate, NewDoctor};
use crate::domain::foundation::{DoctorId, DomainError};
use crate::ports::DoctorRepository;

/// Service for the doctor directory.
pub struct DirectoryService {
    doctors: Arc<dyn DoctorRepository>,
}

impl DirectoryService {
    pub fn new(doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { doctors }
    }

    /// Lists all doctors.
    pub async fn list(&self) -> Result<Vec<Doctor>, DomainError> {
        self.doctors.list().await
    }

    /// Returns a doctor, or `None` if the id is unknown.
    pub async fn get(&self, id: DoctorId) -> Result<Option<Doctor>, DomainError> {
        self.doctors.find_by_id(id).await
    }

    /// Creates a doctor; the store assigns the id.
    pub async fn create(&self, doctor: NewDoctor) -> Result<Doctor, DomainError> {
        let doctor = self.doctors.insert(doctor).await?;
        tracing::info!(doctor_id = %doctor.id, "Doctor created");
        Ok(doctor)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// - `DoctorNotFound` if the id is absent
    pub async fn update(&self, id: DoctorId, update: DoctorUpdate) -> Result<Doctor, DomainError> {
        self.doctors.update(id, update).await
    }

    /// Deletes a doctor and returns the deleted record.
    ///
    /// # Errors
    ///
    /// - `DoctorNotFound` if the id is absent
    pub async fn delete(&self, id: DoctorId) -> Result<Doctor, DomainError> {
        let doctor = self.doctors.delete(id).await?;
        tracing::info!(doctor_id = %doctor.id, "Doctor deleted");
        Ok(doctor)
    }
}

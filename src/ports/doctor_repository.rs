//! DoctorRepository port - persistence for the doctor directory.

use async_trait::async_trait;

use crate::domain::doctor::{Doctor, DoctorUpdate, NewDoctor};
use crate::domain::foundation::{DoctorId, DomainError};

/// Port for doctor directory persistence. Plain CRUD, no business rules.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Lists all doctors.
    async fn list(&self) -> Result<Vec<Doctor>, DomainError>;

    /// Looks a doctor up by id.
    async fn find_by_id(&self, id: DoctorId) -> Result<Option<Doctor>, DomainError>;

    /// Inserts a new doctor; the store assigns the id.
    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor, DomainError>;

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    ///
    /// - `DoctorNotFound` if the id is absent
    async fn update(&self, id: DoctorId, update: DoctorUpdate) -> Result<Doctor, DomainError>;

    /// Deletes a doctor and returns the deleted record.
    ///
    /// # Errors
    ///
    /// - `DoctorNotFound` if the id is absent
    async fn delete(&self, id: DoctorId) -> Result<Doctor, DomainError>;
}

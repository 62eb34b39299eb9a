//! Doctor profile entity.
//!
//! Doctors are independently managed directory records. Consultations
//! reference them by id but never own them.

use serde::Serialize;

use crate::domain::foundation::DoctorId;

/// A doctor profile in the directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialization: String,
    /// Years of practice.
    pub experience: i32,
    pub rating: f64,
    pub bio: String,
    pub photo_url: Option<String>,
    pub is_available: bool,
}

/// Data for inserting a new doctor. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub experience: i32,
    pub rating: f64,
    pub bio: String,
    pub photo_url: Option<String>,
}

/// Partial doctor update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct DoctorUpdate {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<i32>,
    pub rating: Option<f64>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub is_available: Option<bool>,
}

impl DoctorUpdate {
    /// True when the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.specialization.is_none()
            && self.experience.is_none()
            && self.rating.is_none()
            && self.bio.is_none()
            && self.photo_url.is_none()
            && self.is_available.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_detected() {
        assert!(DoctorUpdate::default().is_empty());

        let update = DoctorUpdate {
            is_available: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}

//! Doctor directory domain.

mod doctor;

pub use doctor::{Doctor, DoctorUpdate, NewDoctor};

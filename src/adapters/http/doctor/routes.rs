//! HTTP routes for doctor endpoints.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::application::DirectoryService;

use super::handlers::{
    create_doctor, delete_doctor, get_doctor, list_doctors, update_doctor, DoctorHandlers,
};

/// Creates the doctor router with all endpoints.
pub fn doctor_routes(directory: Arc<DirectoryService>) -> Router {
    Router::new()
        .route("/", get(list_doctors))
        .route("/", post(create_doctor))
        .route("/:id", get(get_doctor))
        .route("/:id", put(update_doctor))
        .route("/:id", delete(delete_doctor))
        .with_state(DoctorHandlers::new(directory))
}

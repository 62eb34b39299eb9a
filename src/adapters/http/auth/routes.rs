//! HTTP routes for auth endpoints.

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::application::IdentityService;

use super::handlers::{get_user, login, register, update_user, AuthHandlers};

/// Creates the auth router with all endpoints.
pub fn auth_routes(identity: Arc<IdentityService>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user", get(get_user))
        .route("/user", patch(update_user))
        .with_state(AuthHandlers::new(identity))
}

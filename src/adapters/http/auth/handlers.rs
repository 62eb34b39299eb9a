//! HTTP handlers for auth endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{IdentityService, ProfileUpdateRequest, Registration};

use super::dto::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UserProfileResponse,
};

/// Shared state for auth handlers.
#[derive(Clone)]
pub struct AuthHandlers {
    identity: Arc<IdentityService>,
}

impl AuthHandlers {
    pub fn new(identity: Arc<IdentityService>) -> Self {
        Self { identity }
    }
}

/// POST /auth/register - Create a new account.
pub async fn register(
    State(handlers): State<AuthHandlers>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfileResponse>), ApiError> {
    let profile = handlers
        .identity
        .register(Registration {
            username: request.username,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            email: request.email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile.into())))
}

/// POST /auth/login - Validate credentials and issue a session token.
pub async fn login(
    State(handlers): State<AuthHandlers>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let profile = handlers
        .identity
        .authenticate(&request.email, &request.password)
        .await?;

    let session = handlers.identity.issue_session(&profile)?;

    Ok(Json(LoginResponse {
        access_token: session.access_token,
        user: session.user.into(),
    }))
}

/// GET /auth/user - The caller's profile.
pub async fn get_user(
    State(handlers): State<AuthHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = handlers
        .identity
        .get_profile(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(profile.into()))
}

/// PATCH /auth/user - Partially update the caller's profile.
pub async fn update_user(
    State(handlers): State<AuthHandlers>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = handlers
        .identity
        .update_profile(
            user.id,
            ProfileUpdateRequest {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                date_of_birth: request.date_of_birth,
            },
        )
        .await?;

    Ok(Json(profile.into()))
}

//! Authentication middleware and extractor for axum.
//!
//! The middleware validates Bearer tokens through the `TokenService` port
//! and injects the authenticated user into request extensions; handlers
//! opt in to enforcement with the `RequireAuth` extractor.
//!
//! ```text
//! Request -> auth_middleware -> injects AuthenticatedUser into extensions
//!                                      |
//!                              Handler -> RequireAuth reads from extensions
//! ```
//!
//! A request without an Authorization header passes through untouched, so
//! public routes (doctor listing, register, login) share the same stack; a
//! request with an invalid or expired token is rejected immediately.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::TokenService;

/// Auth middleware state - the token service behind an Arc.
pub type AuthState = Arc<dyn TokenService>;

/// Validates Bearer tokens and injects [`AuthenticatedUser`].
///
/// Expects the token in the `Authorization` header with `Bearer` prefix.
pub async fn auth_middleware(
    State(tokens): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match tokens.verify(token) {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => ApiError::from(e).into_response(),
        },
        None => {
            // No token provided - continue without auth.
            // Handlers use RequireAuth to enforce authentication.
            next.run(request).await
        }
    }
}

/// Extractor that requires an authenticated user.
///
/// Rejects with 401 when the auth middleware did not inject a user (no
/// token, or the route stack skipped the middleware).
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

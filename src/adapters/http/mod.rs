//! HTTP boundary - axum routers, middleware, and error shaping.

pub mod auth;
pub mod consultation;
pub mod doctor;
pub mod error;
pub mod middleware;
pub mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware as axum_middleware, Router};
use http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::{ConsultationService, DirectoryService, IdentityService, SupportService};
use crate::config::ServerConfig;
use crate::ports::TokenService;

use self::middleware::{auth_middleware, AuthState};

/// Everything the HTTP boundary needs, constructed once at startup.
pub struct AppServices {
    pub identity: Arc<IdentityService>,
    pub directory: Arc<DirectoryService>,
    pub consultations: Arc<ConsultationService>,
    pub support: Arc<SupportService>,
    pub tokens: Arc<dyn TokenService>,
}

/// Assembles the full application router.
///
/// Layer order (outermost first): trace, error envelope, CORS, timeout,
/// auth. The envelope sits outside auth so token rejections are shaped
/// like every other error.
pub fn build_router(services: AppServices, server: &ServerConfig) -> Router {
    let auth_state: AuthState = services.tokens;

    Router::new()
        .nest("/auth", auth::auth_routes(services.identity))
        .nest("/doctors", doctor::doctor_routes(services.directory))
        .nest(
            "/consultations",
            consultation::consultation_routes(services.consultations),
        )
        .nest("/health-support", support::support_routes(services.support))
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .layer(cors_layer(server))
        .layer(axum_middleware::from_fn(error::error_envelope))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins; permissive when none are set.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

//! HTTP error shaping.
//!
//! Every error response leaving the service has the same envelope:
//!
//! ```json
//! {
//!   "statusCode": 409,
//!   "timestamp": "2024-06-15T12:00:00Z",
//!   "path": "/auth/register",
//!   "method": "POST",
//!   "message": "Email already in use",
//!   "success": false,
//!   "field": "email",
//!   "errorCode": "EMAIL_EXISTS"
//! }
//! ```
//!
//! Handlers produce an [`ApiError`] (status + message + optional field and
//! code); the [`error_envelope`] middleware owns the envelope itself and is
//! the single place that knows the request path, method, and timestamp. 5xx
//! bodies are rewritten to a generic message while the original detail is
//! logged server-side.

use axum::{
    body::{to_bytes, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::domain::foundation::{AuthError, DomainError, ErrorCode};

/// What a 5xx body says instead of the real failure.
const GENERIC_SERVER_ERROR: &str =
    "An error occurred on the server. Please try again later.";

/// Largest error body the envelope middleware will buffer.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Error produced by handlers, before enveloping.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub field: Option<String>,
    pub error_code: Option<String>,
}

impl ApiError {
    /// Creates an error with just a status and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field: None,
            error_code: None,
        }
    }

    /// 400 with a message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 with a message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 401 with a message and the UNAUTHORIZED code.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
            field: None,
            error_code: Some(ErrorCode::Unauthorized.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self {
            status: status_for(err.code),
            field: err.field().map(String::from),
            error_code: Some(err.code.to_string()),
            message: err.message,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => ApiError::unauthorized("Token expired"),
            AuthError::InvalidToken => ApiError::unauthorized("Invalid token"),
            AuthError::SigningFailed(detail) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::Map::new();
        body.insert("message".to_string(), Value::String(self.message));
        if let Some(field) = self.field {
            body.insert("field".to_string(), Value::String(field));
        }
        if let Some(code) = self.error_code {
            body.insert("errorCode".to_string(), Value::String(code));
        }
        (self.status, Json(Value::Object(body))).into_response()
    }
}

/// Maps domain error codes onto HTTP statuses.
fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::WeakPassword | ErrorCode::ConsultationNotActive => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::EmailNotFound | ErrorCode::InvalidPassword | ErrorCode::Unauthorized => {
            StatusCode::UNAUTHORIZED
        }
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::UserNotFound | ErrorCode::DoctorNotFound | ErrorCode::ConsultationNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::EmailExists | ErrorCode::UsernameExists | ErrorCode::InvalidStateTransition => {
            StatusCode::CONFLICT
        }
        ErrorCode::CompletionProviderError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Middleware wrapping every error response in the standard envelope.
///
/// Runs outermost so it also catches rejections produced by extractors and
/// other middleware, whose bodies are plain text rather than our JSON.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let bytes = to_bytes(response.into_body(), ERROR_BODY_LIMIT)
        .await
        .unwrap_or_else(|_| Bytes::new());

    let body = envelope_body(status, &method, &path, &bytes);
    (status, Json(body)).into_response()
}

/// Builds the envelope, merging message/field/errorCode out of the
/// original body when it was JSON.
fn envelope_body(status: StatusCode, method: &str, path: &str, raw: &[u8]) -> Value {
    let mut message = status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string();
    let mut field = None;
    let mut error_code = None;

    if let Ok(value) = serde_json::from_slice::<Value>(raw) {
        if let Some(m) = value.get("message").and_then(Value::as_str) {
            message = m.to_string();
        }
        field = value.get("field").and_then(Value::as_str).map(String::from);
        error_code = value
            .get("errorCode")
            .and_then(Value::as_str)
            .map(String::from);
    } else if let Ok(text) = std::str::from_utf8(raw) {
        if !text.trim().is_empty() {
            message = text.trim().to_string();
        }
    }

    if status.is_server_error() {
        // Full detail stays server-side; the client gets a generic body.
        tracing::error!(method, path, status = status.as_u16(), detail = %message, "Request failed");
        message = GENERIC_SERVER_ERROR.to_string();
        field = None;
        error_code = None;
    }

    let mut body = serde_json::Map::new();
    body.insert("statusCode".to_string(), json!(status.as_u16()));
    body.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
    body.insert("path".to_string(), json!(path));
    body.insert("method".to_string(), json!(method));
    body.insert("message".to_string(), json!(message));
    body.insert("success".to_string(), json!(false));
    if let Some(field) = field {
        body.insert("field".to_string(), json!(field));
    }
    if let Some(code) = error_code {
        body.insert("errorCode".to_string(), json!(code));
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_codes_map_onto_statuses() {
        let cases = [
            (ErrorCode::WeakPassword, StatusCode::BAD_REQUEST),
            (ErrorCode::ConsultationNotActive, StatusCode::BAD_REQUEST),
            (ErrorCode::EmailNotFound, StatusCode::UNAUTHORIZED),
            (ErrorCode::InvalidPassword, StatusCode::UNAUTHORIZED),
            (ErrorCode::Forbidden, StatusCode::FORBIDDEN),
            (ErrorCode::ConsultationNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::EmailExists, StatusCode::CONFLICT),
            (ErrorCode::UsernameExists, StatusCode::CONFLICT),
            (ErrorCode::DatabaseError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(status_for(code), status, "{:?}", code);
        }
    }

    #[test]
    fn api_error_carries_field_and_code_from_domain_error() {
        let err = ApiError::from(DomainError::for_field(
            ErrorCode::EmailExists,
            "email",
            "Email already in use",
        ));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.field.as_deref(), Some("email"));
        assert_eq!(err.error_code.as_deref(), Some("EMAIL_EXISTS"));
    }

    #[test]
    fn envelope_merges_json_body_fields() {
        let raw = br#"{"message":"Email already in use","field":"email","errorCode":"EMAIL_EXISTS"}"#;
        let body = envelope_body(StatusCode::CONFLICT, "POST", "/auth/register", raw);

        assert_eq!(body["statusCode"], 409);
        assert_eq!(body["path"], "/auth/register");
        assert_eq!(body["method"], "POST");
        assert_eq!(body["message"], "Email already in use");
        assert_eq!(body["field"], "email");
        assert_eq!(body["errorCode"], "EMAIL_EXISTS");
        assert_eq!(body["success"], false);
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn envelope_uses_plain_text_bodies_as_message() {
        let body = envelope_body(
            StatusCode::BAD_REQUEST,
            "POST",
            "/consultations",
            b"Invalid request body",
        );
        assert_eq!(body["message"], "Invalid request body");
    }

    #[test]
    fn envelope_falls_back_to_canonical_reason() {
        let body = envelope_body(StatusCode::NOT_FOUND, "GET", "/nope", b"");
        assert_eq!(body["message"], "Not Found");
    }

    #[test]
    fn server_errors_are_masked() {
        let raw = br#"{"message":"db connection string leaked: postgres://secret"}"#;
        let body = envelope_body(StatusCode::INTERNAL_SERVER_ERROR, "GET", "/doctors", raw);

        assert_eq!(body["message"], GENERIC_SERVER_ERROR);
        assert!(body.get("field").is_none());
        assert!(body.get("errorCode").is_none());
    }

    #[test]
    fn expired_token_maps_to_unauthorized() {
        let err = ApiError::from(AuthError::TokenExpired);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Token expired");
    }
}

//! HTTP DTOs for auth endpoints.
//!
//! These types decouple the HTTP API from domain types; the wire uses
//! camelCase field names.

use serde::{Deserialize, Serialize};

use crate::application::UserSummary;
use crate::domain::identity::UserProfile;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO date string ("1995-03-12").
    pub date_of_birth: String,
    pub email: String,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to update the caller's profile. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full profile view (never includes password material).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub created_at: String,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.as_i64(),
            username: profile.username,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            date_of_birth: profile.date_of_birth.format("%Y-%m-%d").to_string(),
            created_at: profile.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Public-safe user summary carried alongside tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.as_i64(),
            username: summary.username,
            email: summary.email,
            first_name: summary.first_name,
            last_name: summary.last_name,
        }
    }
}

/// Login response: bearer token plus user summary.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserSummaryResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};
    use chrono::NaiveDate;

    #[test]
    fn register_request_accepts_camel_case() {
        let json = r#"{
            "username": "budi",
            "password": "secret123",
            "firstName": "Budi",
            "lastName": "Santoso",
            "dateOfBirth": "1995-03-12",
            "email": "budi@example.com"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.first_name, "Budi");
        assert_eq!(request.date_of_birth, "1995-03-12");
    }

    #[test]
    fn profile_response_serializes_camel_case_without_password() {
        let profile = UserProfile {
            id: UserId::from_i64(1),
            username: "budi".to_string(),
            email: "budi@example.com".to_string(),
            first_name: "Budi".to_string(),
            last_name: "Santoso".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 12).unwrap(),
            created_at: Timestamp::now(),
        };

        let json = serde_json::to_string(&UserProfileResponse::from(profile)).unwrap();
        assert!(json.contains("\"firstName\":\"Budi\""));
        assert!(json.contains("\"dateOfBirth\":\"1995-03-12\""));
        assert!(!json.contains("password"));
    }
}

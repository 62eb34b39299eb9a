//! User entity and profile projections.
//!
//! `User` is the full stored record including the password hash. Everything
//! that leaves the service layer is a `UserProfile`, which never carries the
//! hash.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};

/// Minimum accepted raw password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A registered user as stored, password hash included.
///
/// # Invariants
///
/// - `email` and `username` are each globally unique
/// - `password_hash` is a salted one-way hash, never a raw password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    created_at: Timestamp,
}

impl User {
    /// Reconstitute a user from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        username: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        date_of_birth: NaiveDate,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            first_name,
            last_name,
            date_of_birth,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the stored password hash for verification.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Full display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Strips the password hash, producing the public-safe projection.
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            created_at: self.created_at,
        }
    }

    /// Borrowing variant of [`User::into_profile`].
    pub fn profile(&self) -> UserProfile {
        self.clone().into_profile()
    }
}

/// Public-safe user projection - no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub created_at: Timestamp,
}

impl UserProfile {
    /// Full display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data for inserting a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl ProfileUpdate {
    /// True when the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.date_of_birth.is_none()
    }
}

/// Checks raw password strength before hashing.
///
/// # Errors
///
/// - `WeakPassword` if the password is shorter than [`MIN_PASSWORD_LENGTH`]
pub fn validate_password(raw: &str) -> Result<(), DomainError> {
    if raw.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::for_field(
            ErrorCode::WeakPassword,
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

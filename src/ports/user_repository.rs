//! UserRepository port - persistence for registered users.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::identity::{NewUser, ProfileUpdate, User};

/// Port for user persistence.
///
/// The store enforces UNIQUE constraints on `email` and `username`;
/// implementations surface violations as `EmailExists` / `UsernameExists`
/// so check-then-insert races still produce a typed conflict.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user; the store assigns the id.
    ///
    /// # Errors
    ///
    /// - `EmailExists` / `UsernameExists` on unique violations
    async fn insert(&self, user: NewUser) -> Result<User, DomainError>;

    /// Looks a user up by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Looks a user up by email (unique).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Looks a user up by username (unique).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Applies a partial profile update and returns the updated record.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the record disappeared between check and write
    /// - `EmailExists` if the new email collides with another user
    async fn update_profile(&self, id: UserId, update: ProfileUpdate)
        -> Result<User, DomainError>;
}

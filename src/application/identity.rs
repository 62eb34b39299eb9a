//! IdentityService - registration, credential validation, session issue,
//! and profile management.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::identity::{validate_password, NewUser, ProfileUpdate, UserProfile};
use crate::ports::{PasswordHasher, TokenService, UserRepository};

/// Registration input, as it arrives from the HTTP boundary.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO date string ("1995-03-12"); converted here.
    pub date_of_birth: String,
    pub email: String,
}

/// Partial profile update input. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdateRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// ISO date string; converted here when present.
    pub date_of_birth: Option<String>,
}

/// Issued session: signed token plus a public-safe user summary.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: UserSummary,
}

/// Public-safe user summary returned alongside tokens.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&UserProfile> for UserSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
        }
    }
}

/// Service for user identity: registration, authentication, sessions,
/// profile reads and updates.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Registers a new user.
    ///
    /// Uniqueness is checked sequentially, email first, so the caller gets
    /// a field-tagged conflict; the store's UNIQUE constraints back the
    /// check up against races.
    ///
    /// # Errors
    ///
    /// - `EmailExists` / `UsernameExists` on conflicts
    /// - `WeakPassword` if the raw password is shorter than 6 characters
    /// - `ValidationFailed` if the date of birth does not parse
    pub async fn register(&self, registration: Registration) -> Result<UserProfile, DomainError> {
        if self
            .users
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(DomainError::for_field(
                ErrorCode::EmailExists,
                "email",
                "Email already in use",
            ));
        }

        if self
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(DomainError::for_field(
                ErrorCode::UsernameExists,
                "username",
                "Username already in use",
            ));
        }

        validate_password(&registration.password)?;

        let date_of_birth = parse_date_of_birth(&registration.date_of_birth)?;
        let password_hash = self.hasher.hash(&registration.password)?;

        let user = self
            .users
            .insert(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
                date_of_birth,
            })
            .await?;

        tracing::info!(user_id = %user.id(), "User registered");
        Ok(user.into_profile())
    }

    /// Validates credentials and returns the stripped profile.
    ///
    /// # Errors
    ///
    /// - `EmailNotFound` if no user has this email
    /// - `InvalidPassword` if the hash comparison fails
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, DomainError> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            DomainError::for_field(ErrorCode::EmailNotFound, "email", "Email not found")
        })?;

        if !self.hasher.verify(password, user.password_hash())? {
            return Err(DomainError::for_field(
                ErrorCode::InvalidPassword,
                "password",
                "Incorrect password",
            ));
        }

        Ok(user.into_profile())
    }

    /// Issues a signed session token for an authenticated profile.
    pub fn issue_session(&self, profile: &UserProfile) -> Result<Session, DomainError> {
        let access_token = self.tokens.issue(profile).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Token issue failed: {}", e))
        })?;

        Ok(Session {
            access_token,
            user: UserSummary::from(profile),
        })
    }

    /// Returns the stored profile, or `None` if the user is unknown.
    pub async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .map(|user| user.into_profile()))
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// - `EmailExists` if the new email belongs to a different user
    /// - `ValidationFailed` if the date of birth does not parse
    /// - `UserNotFound` if the record disappeared between check and write
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: ProfileUpdateRequest,
    ) -> Result<UserProfile, DomainError> {
        if let Some(ref email) = request.email {
            // Uniqueness against all *other* users; keeping one's own email
            // is not a conflict.
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id() != user_id {
                    return Err(DomainError::for_field(
                        ErrorCode::EmailExists,
                        "email",
                        "Email already in use",
                    ));
                }
            }
        }

        let date_of_birth = request
            .date_of_birth
            .as_deref()
            .map(parse_date_of_birth)
            .transpose()?;

        let update = ProfileUpdate {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth,
        };

        let user = self.users.update_profile(user_id, update).await?;
        Ok(user.into_profile())
    }
}

/// Converts an ISO date-of-birth string to a date value.
fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DomainError::for_field(
            ErrorCode::ValidationFailed,
            "dateOfBirth",
            "Date of birth must be an ISO date (YYYY-MM-DD)",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp};
    use crate::domain::identity::User;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════
    // Test infrastructure
    // ════════════════════════════════════════════════════════════════════

    struct MockUserRepository {
        users: Mutex<Vec<User>>,
        next_id: Mutex<i64>,
    }

    impl MockUserRepository {
        fn new() -> Self {
            Self {
                users: Mutex::new(Vec::new()),
                next_id: Mutex::new(1),
            }
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn insert(&self, new_user: NewUser) -> Result<User, DomainError> {
            let mut next_id = self.next_id.lock().unwrap();
            let user = User::reconstitute(
                UserId::from_i64(*next_id),
                new_user.username,
                new_user.email,
                new_user.password_hash,
                new_user.first_name,
                new_user.last_name,
                new_user.date_of_birth,
                Timestamp::now(),
            );
            *next_id += 1;
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id() == id)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email() == email)
                .cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username() == username)
                .cloned())
        }

        async fn update_profile(
            &self,
            id: UserId,
            update: ProfileUpdate,
        ) -> Result<User, DomainError> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id() == id)
                .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;

            let profile = user.profile();
            let updated = User::reconstitute(
                id,
                profile.username,
                update.email.unwrap_or(profile.email),
                user.password_hash().to_string(),
                update.first_name.unwrap_or(profile.first_name),
                update.last_name.unwrap_or(profile.last_name),
                update.date_of_birth.unwrap_or(profile.date_of_birth),
                profile.created_at,
            );
            *user = updated.clone();
            Ok(updated)
        }
    }

    /// Always reports the target user gone at write time - simulates the
    /// check-then-write race.
    struct ForgetfulUserRepository;

    #[async_trait]
    impl UserRepository for ForgetfulUserRepository {
        async fn insert(&self, _user: NewUser) -> Result<User, DomainError> {
            unreachable!("not used")
        }

        async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn update_profile(
            &self,
            _id: UserId,
            _update: ProfileUpdate,
        ) -> Result<User, DomainError> {
            Err(DomainError::new(ErrorCode::UserNotFound, "User not found"))
        }
    }

    struct FakeHasher;

    impl PasswordHasher for FakeHasher {
        fn hash(&self, raw: &str) -> Result<String, DomainError> {
            Ok(format!("hashed:{}", raw))
        }

        fn verify(&self, raw: &str, hash: &str) -> Result<bool, DomainError> {
            Ok(hash == format!("hashed:{}", raw))
        }
    }

    struct FakeTokens;

    impl TokenService for FakeTokens {
        fn issue(&self, profile: &UserProfile) -> Result<String, AuthError> {
            Ok(format!("token-for-{}", profile.id))
        }

        fn verify(&self, _token: &str) -> Result<AuthenticatedUser, AuthError> {
            Err(AuthError::InvalidToken)
        }
    }

    fn service() -> IdentityService {
        IdentityService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(FakeHasher),
            Arc::new(FakeTokens),
        )
    }

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: "secret123".to_string(),
            first_name: "Budi".to_string(),
            last_name: "Santoso".to_string(),
            date_of_birth: "1995-03-12".to_string(),
            email: email.to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn register_returns_profile_without_password() {
        let service = service();
        let profile = service.register(registration("budi", "budi@example.com")).await.unwrap();

        assert_eq!(profile.username, "budi");
        assert_eq!(profile.email, "budi@example.com");
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("hashed:"));
    }

    #[tokio::test]
    async fn duplicate_email_fails_second_registration() {
        let service = service();
        service.register(registration("budi", "same@example.com")).await.unwrap();

        let err = service
            .register(registration("siti", "same@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailExists);
        assert_eq!(err.field(), Some("email"));
    }

    #[tokio::test]
    async fn duplicate_username_fails_second_registration() {
        let service = service();
        service.register(registration("budi", "one@example.com")).await.unwrap();

        let err = service
            .register(registration("budi", "two@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UsernameExists);
        assert_eq!(err.field(), Some("username"));
    }

    #[tokio::test]
    async fn email_conflict_wins_over_username_conflict() {
        let service = service();
        service.register(registration("budi", "same@example.com")).await.unwrap();

        // Both email and username collide; email is checked first.
        let err = service
            .register(registration("budi", "same@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailExists);
    }

    #[tokio::test]
    async fn five_character_password_is_rejected() {
        let service = service();
        let mut reg = registration("budi", "budi@example.com");
        reg.password = "12345".to_string();

        let err = service.register(reg).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::WeakPassword);
    }

    #[tokio::test]
    async fn six_character_password_is_accepted() {
        let service = service();
        let mut reg = registration("budi", "budi@example.com");
        reg.password = "123456".to_string();

        assert!(service.register(reg).await.is_ok());
    }

    #[tokio::test]
    async fn malformed_date_of_birth_is_rejected() {
        let service = service();
        let mut reg = registration("budi", "budi@example.com");
        reg.date_of_birth = "12/03/1995".to_string();

        let err = service.register(reg).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.field(), Some("dateOfBirth"));
    }

    #[tokio::test]
    async fn authenticate_with_unknown_email_fails() {
        let service = service();
        let err = service
            .authenticate("nobody@example.com", "whatever")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailNotFound);
    }

    #[tokio::test]
    async fn authenticate_with_wrong_password_fails() {
        let service = service();
        service.register(registration("budi", "budi@example.com")).await.unwrap();

        let err = service
            .authenticate("budi@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPassword);
    }

    #[tokio::test]
    async fn authenticate_with_correct_credentials_returns_profile() {
        let service = service();
        service.register(registration("budi", "budi@example.com")).await.unwrap();

        let profile = service
            .authenticate("budi@example.com", "secret123")
            .await
            .unwrap();
        assert_eq!(profile.username, "budi");
    }

    #[tokio::test]
    async fn issued_session_carries_token_and_summary() {
        let service = service();
        let profile = service.register(registration("budi", "budi@example.com")).await.unwrap();

        let session = service.issue_session(&profile).unwrap();
        assert_eq!(session.access_token, format!("token-for-{}", profile.id));
        assert_eq!(session.user.username, "budi");
    }

    #[tokio::test]
    async fn get_profile_returns_none_for_unknown_user() {
        let service = service();
        assert!(service
            .get_profile(UserId::from_i64(404))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_profile_rejects_email_of_another_user() {
        let service = service();
        service.register(registration("budi", "budi@example.com")).await.unwrap();
        let other = service.register(registration("siti", "siti@example.com")).await.unwrap();

        let err = service
            .update_profile(
                other.id,
                ProfileUpdateRequest {
                    email: Some("budi@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailExists);
    }

    #[tokio::test]
    async fn update_profile_accepts_keeping_own_email() {
        let service = service();
        let profile = service.register(registration("budi", "budi@example.com")).await.unwrap();

        let updated = service
            .update_profile(
                profile.id,
                ProfileUpdateRequest {
                    email: Some("budi@example.com".to_string()),
                    first_name: Some("Budiman".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Budiman");
    }

    #[tokio::test]
    async fn update_profile_converts_date_of_birth_string() {
        let service = service();
        let profile = service.register(registration("budi", "budi@example.com")).await.unwrap();

        let updated = service
            .update_profile(
                profile.id,
                ProfileUpdateRequest {
                    date_of_birth: Some("1990-01-31".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            updated.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 1, 31).unwrap()
        );
    }

    #[tokio::test]
    async fn update_profile_surfaces_vanished_record_as_not_found() {
        let service = IdentityService::new(
            Arc::new(ForgetfulUserRepository),
            Arc::new(FakeHasher),
            Arc::new(FakeTokens),
        );

        let err = service
            .update_profile(UserId::from_i64(1), ProfileUpdateRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}

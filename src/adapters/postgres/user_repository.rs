//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::identity::{NewUser, ProfileUpdate, User};
use crate::ports::UserRepository;

use super::{db_error, unique_violation};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (
                username, email, password_hash, first_name, last_name, date_of_birth
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, password_hash, first_name, last_name,
                      date_of_birth, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.date_of_birth)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row_to_user(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   date_of_birth, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch user", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   date_of_birth, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch user by email", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   date_of_birth, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch user by username", e))?;

        row.map(row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                date_of_birth = COALESCE($5, date_of_birth)
            WHERE id = $1
            RETURNING id, username, email, password_hash, first_name, last_name,
                      date_of_birth, created_at
            "#,
        )
        .bind(id.as_i64())
        .bind(update.email)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.date_of_birth)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_insert_error)?;

        match row {
            Some(row) => row_to_user(row),
            // The record vanished between check and write.
            None => Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", id),
            )),
        }
    }
}

/// Maps unique violations onto the typed conflict errors; everything else
/// is an infrastructure error.
fn map_insert_error(err: sqlx::Error) -> DomainError {
    if let Some(constraint) = unique_violation(&err) {
        if constraint.contains("email") {
            return DomainError::for_field(ErrorCode::EmailExists, "email", "Email already in use");
        }
        if constraint.contains("username") {
            return DomainError::for_field(
                ErrorCode::UsernameExists,
                "username",
                "Username already in use",
            );
        }
    }
    db_error("Failed to write user", err)
}

fn row_to_user(row: PgRow) -> Result<User, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| db_error("Failed to read user row", e))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| db_error("Failed to read user row", e))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| db_error("Failed to read user row", e))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| db_error("Failed to read user row", e))?;
    let first_name: String = row
        .try_get("first_name")
        .map_err(|e| db_error("Failed to read user row", e))?;
    let last_name: String = row
        .try_get("last_name")
        .map_err(|e| db_error("Failed to read user row", e))?;
    let date_of_birth: NaiveDate = row
        .try_get("date_of_birth")
        .map_err(|e| db_error("Failed to read user row", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| db_error("Failed to read user row", e))?;

    Ok(User::reconstitute(
        UserId::from_i64(id),
        username,
        email,
        password_hash,
        first_name,
        last_name,
        date_of_birth,
        Timestamp::from_datetime(created_at),
    ))
}

//! MySQL implementation of the UserRepository trait.
//!
//! Refresh and reset tokens are stored as SHA-256 hashes next to their
//! expiry; a hash column is never set without its expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use sh_core::domain::entities::token::ExpiringToken;
use sh_core::domain::entities::user::{SignInMethod, User, UserRole};
use sh_core::errors::{AuthError, DomainError};
use sh_core::repositories::UserRepository;

use super::{column, db_error, is_unique_violation};

const USER_COLUMNS: &str = r#"
    id, name, email, phone_number, password_hash, profile_image_url,
    last_login_at, sign_in_method, role, is_active,
    refresh_token_hash, refresh_token_expires_at,
    reset_token_hash, reset_token_expires_at,
    store_id, created_at, updated_at
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let sign_in_tag: i8 = column(row, "sign_in_method")?;
        let role: String = column(row, "role")?;

        Ok(User {
            id: column(row, "id")?,
            name: column(row, "name")?,
            email: column(row, "email")?,
            phone_number: column(row, "phone_number")?,
            password_hash: column(row, "password_hash")?,
            profile_image_url: column(row, "profile_image_url")?,
            last_login_at: column(row, "last_login_at")?,
            sign_in_method: SignInMethod::from_tag(sign_in_tag).unwrap_or(SignInMethod::Email),
            role: UserRole::parse(&role),
            is_active: column(row, "is_active")?,
            refresh_token: expiring_token(
                column(row, "refresh_token_hash")?,
                column(row, "refresh_token_expires_at")?,
            ),
            password_reset: expiring_token(
                column(row, "reset_token_hash")?,
                column(row, "reset_token_expires_at")?,
            ),
            store_id: column(row, "store_id")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ? LIMIT 1", USER_COLUMNS, filter);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

fn expiring_token(
    hash: Option<String>,
    expires_at: Option<DateTime<Utc>>,
) -> Option<ExpiringToken> {
    match (hash, expires_at) {
        (Some(hash), Some(expires_at)) => Some(ExpiringToken { hash, expires_at }),
        _ => None,
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn find_by_refresh_token(&self, token_hash: &str) -> Result<Option<User>, DomainError> {
        self.find_one("refresh_token_hash", token_hash).await
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, DomainError> {
        self.find_one("reset_token_hash", token_hash).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to check email"))?;

        Ok(exists == 1)
    }

    async fn create(&self, mut user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                name, email, phone_number, password_hash, profile_image_url,
                last_login_at, sign_in_method, role, is_active,
                refresh_token_hash, refresh_token_expires_at,
                reset_token_hash, reset_token_expires_at,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone_number)
            .bind(&user.password_hash)
            .bind(&user.profile_image_url)
            .bind(user.last_login_at)
            .bind(user.sign_in_method.tag())
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.refresh_token.as_ref().map(|t| t.hash.as_str()))
            .bind(user.refresh_token.as_ref().map(|t| t.expires_at))
            .bind(user.password_reset.as_ref().map(|t| t.hash.as_str()))
            .bind(user.password_reset.as_ref().map(|t| t.expires_at))
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::from(AuthError::EmailAlreadyExists)
                } else {
                    db_error("Failed to create user")(e)
                }
            })?;

        user.id = result.last_insert_id() as i64;
        Ok(user)
    }

    /// Writes everything except `store_id`, which the store repository owns
    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let query = r#"
            UPDATE users SET
                name = ?,
                phone_number = ?,
                password_hash = ?,
                profile_image_url = ?,
                last_login_at = ?,
                role = ?,
                is_active = ?,
                refresh_token_hash = ?,
                refresh_token_expires_at = ?,
                reset_token_hash = ?,
                reset_token_expires_at = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.phone_number)
            .bind(&user.password_hash)
            .bind(&user.profile_image_url)
            .bind(user.last_login_at)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.refresh_token.as_ref().map(|t| t.hash.as_str()))
            .bind(user.refresh_token.as_ref().map(|t| t.expires_at))
            .bind(user.password_reset.as_ref().map(|t| t.hash.as_str()))
            .bind(user.password_reset.as_ref().map(|t| t.expires_at))
            .bind(user.updated_at.unwrap_or_else(Utc::now))
            .bind(user.id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound.into());
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list users"))?;

        rows.iter().map(Self::row_to_user).collect()
    }
}

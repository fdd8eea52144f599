//! User repository trait defining the interface for user data persistence.
//!
//! The trait is async-first and uses Result types for proper error handling.
//! Refresh and reset tokens are looked up by their SHA-256 hash; raw token
//! values never reach the repository.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use sh_core::repositories::UserRepository;
/// use sh_core::domain::entities::user::User;
/// use sh_core::errors::DomainError;
///
/// struct MySqlUserRepository {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for MySqlUserRepository {
///     async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
///         // Implementation here
///         Ok(None)
///     }
///
///     // ... other methods
/// #   async fn find_by_email(&self, _: &str) -> Result<Option<User>, DomainError> { Ok(None) }
/// #   async fn find_by_refresh_token(&self, _: &str) -> Result<Option<User>, DomainError> { Ok(None) }
/// #   async fn find_by_reset_token(&self, _: &str) -> Result<Option<User>, DomainError> { Ok(None) }
/// #   async fn exists_by_email(&self, _: &str) -> Result<bool, DomainError> { Ok(false) }
/// #   async fn create(&self, user: User) -> Result<User, DomainError> { Ok(user) }
/// #   async fn update(&self, _: &User) -> Result<(), DomainError> { Ok(()) }
/// #   async fn find_all(&self) -> Result<Vec<User>, DomainError> { Ok(vec![]) }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given ID
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Find a user by email (exact, case-sensitive match)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find the user whose current refresh token hashes to `token_hash`
    ///
    /// Expiry is not checked here; callers decide what an expired token means.
    async fn find_by_refresh_token(&self, token_hash: &str) -> Result<Option<User>, DomainError>;

    /// Find the user whose pending password reset hashes to `token_hash`
    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, DomainError>;

    /// Check whether an account with this email exists
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Insert a new user and return it with its assigned id
    ///
    /// # Errors
    /// * `AuthError::EmailAlreadyExists` - The unique email constraint was violated
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Persist every mutable field of an existing user
    ///
    /// # Errors
    /// * `DomainError::NotFound` - No row with `user.id`
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// All users, oldest first
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;
}

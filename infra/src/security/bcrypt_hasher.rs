//! bcrypt implementation of the PasswordHasher trait.
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool.

use async_trait::async_trait;

use sh_core::domain::entities::user::User;
use sh_core::errors::{DomainError, DomainResult};
use sh_core::services::external::{PasswordHasher, PasswordVerification};

/// bcrypt with a configurable cost factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, _user: &User, password: &str) -> DomainResult<String> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| DomainError::internal(format!("Password hashing failed: {}", e)))
    }

    async fn verify(&self, user: &User, hash: &str, password: &str) -> PasswordVerification {
        let password = password.to_owned();
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(Ok(true)) => PasswordVerification::Match,
            Ok(Ok(false)) => PasswordVerification::Mismatch,
            Ok(Err(e)) => {
                tracing::warn!(user_id = user.id, error = %e, "Stored password hash is malformed");
                PasswordVerification::Mismatch
            }
            Err(e) => {
                tracing::error!(user_id = user.id, error = %e, "Password verification task failed");
                PasswordVerification::Mismatch
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("Test", "test@example.com", None, String::new())
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        // Minimum cost keeps the test fast
        let hasher = BcryptPasswordHasher::new(4);
        let user = user();

        let hash = hasher.hash(&user, "secret123").await.unwrap();

        assert_ne!(hash, "secret123");
        assert!(hasher.verify(&user, &hash, "secret123").await.is_match());
        assert!(!hasher.verify(&user, &hash, "secret124").await.is_match());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = BcryptPasswordHasher::new(4);
        let user = user();

        let first = hasher.hash(&user, "secret123").await.unwrap();
        let second = hasher.hash(&user, "secret123").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_mismatch() {
        let hasher = BcryptPasswordHasher::new(4);

        let result = hasher.verify(&user(), "not-a-bcrypt-hash", "secret123").await;

        assert_eq!(result, PasswordVerification::Mismatch);
    }
}

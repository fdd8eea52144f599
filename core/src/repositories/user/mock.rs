//! Mock implementation of UserRepository for testing

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::memory::MockDatabase;

use super::trait_::UserRepository;

/// In-memory user repository
#[derive(Debug, Clone, Default)]
pub struct MockUserRepository {
    db: MockDatabase,
}

impl MockUserRepository {
    pub fn new(db: MockDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.db.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_refresh_token(&self, token_hash: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.refresh_token.as_ref().map(|t| t.hash.as_str()) == Some(token_hash))
            .cloned())
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.password_reset.as_ref().map(|t| t.hash.as_str()) == Some(token_hash))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn create(&self, mut user: User) -> Result<User, DomainError> {
        let mut tables = self.db.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists.into());
        }
        user.id = tables.next_id();
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut tables = self.db.tables.write().await;
        match tables.users.get_mut(&user.id) {
            Some(existing) => {
                // store_id is owned by the store repository
                let store_id = existing.store_id;
                *existing = user.clone();
                existing.store_id = store_id;
                Ok(())
            }
            None => Err(DomainError::not_found("User")),
        }
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.db.tables.read().await.users.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = MockDatabase::new().users();
        repo.create(User::new("A", "a@example.com", None, "h".into()))
            .await
            .unwrap();

        let result = repo
            .create(User::new("B", "a@example.com", None, "h".into()))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::EmailAlreadyExists))
        ));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let repo = MockDatabase::new().users();
        repo.create(User::new("A", "a@example.com", None, "h".into()))
            .await
            .unwrap();

        assert!(repo.exists_by_email("a@example.com").await.unwrap());
        assert!(!repo.exists_by_email("A@example.com").await.unwrap());
    }
}

//! Mock implementation of StoreRepository for testing

use async_trait::async_trait;

use crate::domain::entities::store::Store;
use crate::errors::{DomainError, StoreError};
use crate::repositories::memory::MockDatabase;

use super::trait_::StoreRepository;

#[derive(Debug, Clone, Default)]
pub struct MockStoreRepository {
    db: MockDatabase,
}

impl MockStoreRepository {
    pub fn new(db: MockDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreRepository for MockStoreRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Store>, DomainError> {
        Ok(self.db.tables.read().await.stores.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Store>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables.stores.values().find(|s| s.user_id == user_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Store>, DomainError> {
        Ok(self.db.tables.read().await.stores.values().cloned().collect())
    }

    async fn search_text(&self, query: &str) -> Result<Vec<Store>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.matches_text(query))
            .cloned()
            .collect())
    }

    async fn find_with_coordinates(&self) -> Result<Vec<Store>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.latitude.is_some() && s.longitude.is_some())
            .cloned()
            .collect())
    }

    async fn create_for_owner(&self, mut store: Store) -> Result<Store, DomainError> {
        let mut tables = self.db.tables.write().await;
        if tables.stores.values().any(|s| s.user_id == store.user_id) {
            return Err(StoreError::AlreadyHasStore.into());
        }
        if !tables.users.contains_key(&store.user_id) {
            return Err(DomainError::not_found("User"));
        }
        store.id = tables.next_id();
        tables.stores.insert(store.id, store.clone());
        if let Some(owner) = tables.users.get_mut(&store.user_id) {
            owner.store_id = Some(store.id);
        }
        Ok(store)
    }

    async fn update(&self, store: &Store) -> Result<(), DomainError> {
        let mut tables = self.db.tables.write().await;
        match tables.stores.get_mut(&store.id) {
            Some(existing) => {
                *existing = store.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound.into()),
        }
    }

    async fn delete_for_owner(&self, store_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let mut tables = self.db.tables.write().await;
        if tables.stores.remove(&store_id).is_none() {
            return Ok(false);
        }
        let product_ids: Vec<i64> = tables
            .products
            .values()
            .filter(|p| p.store_id == store_id)
            .map(|p| p.id)
            .collect();
        for product_id in product_ids {
            tables.remove_product(product_id);
        }
        if let Some(owner) = tables.users.get_mut(&owner_id) {
            owner.store_id = None;
        }
        Ok(true)
    }
}

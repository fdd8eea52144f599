//! Store repository trait.

use async_trait::async_trait;

use crate::domain::entities::store::Store;
use crate::errors::DomainError;

/// Repository trait for Store persistence.
///
/// Writes that touch the owner (`users.store_id`) run in one transaction
/// together with the store row.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Store>, DomainError>;

    /// The store owned by `user_id`, if any
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Store>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Store>, DomainError>;

    /// Case-insensitive substring search over name, category and description
    async fn search_text(&self, query: &str) -> Result<Vec<Store>, DomainError>;

    /// Stores that have both latitude and longitude set
    async fn find_with_coordinates(&self) -> Result<Vec<Store>, DomainError>;

    /// Insert the store and link it from its owner's `store_id`.
    ///
    /// # Errors
    /// * `StoreError::AlreadyHasStore` - The owner already has a store
    ///   (unique `stores.user_id`)
    async fn create_for_owner(&self, store: Store) -> Result<Store, DomainError>;

    /// Persist every mutable field of an existing store
    async fn update(&self, store: &Store) -> Result<(), DomainError>;

    /// Delete the store (products cascade) and clear the owner's `store_id`.
    ///
    /// # Returns
    /// * `Ok(true)` - Store deleted
    /// * `Ok(false)` - No such store
    async fn delete_for_owner(&self, store_id: i64, owner_id: i64) -> Result<bool, DomainError>;
}

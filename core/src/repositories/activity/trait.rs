//! Favorites and view history.

use async_trait::async_trait;

use crate::domain::entities::engagement::ProductView;
use crate::errors::DomainError;

/// Repository for per-user product activity
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Add a favorite; `Ok(false)` when it already existed
    async fn add_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError>;

    /// Remove a favorite; `Ok(false)` when there was none
    async fn remove_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError>;

    async fn is_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError>;

    /// Favorited product ids, most recently added first
    async fn favorite_product_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError>;

    /// Append a view row
    async fn record_view(&self, view: ProductView) -> Result<(), DomainError>;

    /// The user's `limit` most recent views, most recent first (duplicates included)
    async fn views_by_user(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<ProductView>, DomainError>;
}

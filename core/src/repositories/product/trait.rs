//! Product repository trait.
//!
//! Listing methods return [`ProductDetails`] (images, store name and rating
//! summary joined in) ordered newest first unless stated otherwise.
//! `ProductDetails::is_favorite` is always `false` here; the service fills it.

use async_trait::async_trait;

use crate::domain::entities::product::{Product, ProductPrice};
use crate::domain::value_objects::commands::{Page, ProductSearch};
use crate::domain::value_objects::read_models::ProductDetails;
use crate::errors::DomainError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// The bare product row, used for ownership checks and updates
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;

    async fn find_details(&self, id: i64) -> Result<Option<ProductDetails>, DomainError>;

    /// Details for the given ids; order is unspecified and unknown ids are skipped
    async fn find_details_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductDetails>, DomainError>;

    /// Products of one store, paged when `page` is given
    async fn find_by_store(
        &self,
        store_id: i64,
        page: Option<Page>,
    ) -> Result<Vec<ProductDetails>, DomainError>;

    async fn search(&self, filters: &ProductSearch) -> Result<Vec<ProductDetails>, DomainError>;

    /// The `limit` most recently created products
    async fn find_recent(&self, limit: u32) -> Result<Vec<ProductDetails>, DomainError>;

    /// Insert the product, its first price-history row and its images
    /// (display order = position in `image_urls`) in one transaction.
    async fn create_with_images(
        &self,
        product: Product,
        image_urls: Vec<String>,
    ) -> Result<Product, DomainError>;

    /// Persist the product, append a price row when `price_changed`, and
    /// append `new_image_urls` after the existing images, in one transaction.
    async fn update_with_images(
        &self,
        product: &Product,
        price_changed: bool,
        new_image_urls: Vec<String>,
    ) -> Result<(), DomainError>;

    /// Hard delete; images, prices, ratings, favorites and views cascade
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Price snapshots, oldest first
    async fn price_history(&self, product_id: i64) -> Result<Vec<ProductPrice>, DomainError>;
}

//! Product rating repository trait.

use async_trait::async_trait;

use crate::domain::entities::engagement::{ProductRating, RatingWithAuthor};
use crate::errors::DomainError;

#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Insert or replace the rating for (user, product).
    ///
    /// A second rating by the same user overwrites score and comment and
    /// keeps the existing id and `created_at`.
    async fn upsert(&self, rating: ProductRating) -> Result<ProductRating, DomainError>;

    async fn find_by_user_and_product(
        &self,
        user_id: i64,
        product_id: i64,
    ) -> Result<Option<ProductRating>, DomainError>;

    /// Ratings of a product with the reviewer's name, newest first
    async fn find_by_product(&self, product_id: i64) -> Result<Vec<RatingWithAuthor>, DomainError>;
}

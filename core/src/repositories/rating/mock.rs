//! Mock implementation of RatingRepository for testing

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::engagement::{ProductRating, RatingWithAuthor};
use crate::errors::DomainError;
use crate::repositories::memory::MockDatabase;

use super::trait_::RatingRepository;

#[derive(Debug, Clone, Default)]
pub struct MockRatingRepository {
    db: MockDatabase,
}

impl MockRatingRepository {
    pub fn new(db: MockDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RatingRepository for MockRatingRepository {
    async fn upsert(&self, mut rating: ProductRating) -> Result<ProductRating, DomainError> {
        let mut tables = self.db.tables.write().await;
        if let Some(existing) = tables
            .ratings
            .iter_mut()
            .find(|r| r.user_id == rating.user_id && r.product_id == rating.product_id)
        {
            existing.rating = rating.rating;
            existing.comment = rating.comment;
            existing.updated_at = Some(Utc::now());
            return Ok(existing.clone());
        }
        rating.id = tables.next_id();
        tables.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn find_by_user_and_product(
        &self,
        user_id: i64,
        product_id: i64,
    ) -> Result<Option<ProductRating>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .ratings
            .iter()
            .find(|r| r.user_id == user_id && r.product_id == product_id)
            .cloned())
    }

    async fn find_by_product(&self, product_id: i64) -> Result<Vec<RatingWithAuthor>, DomainError> {
        let tables = self.db.tables.read().await;
        let mut ratings: Vec<RatingWithAuthor> = tables
            .ratings
            .iter()
            .filter(|r| r.product_id == product_id)
            .map(|r| RatingWithAuthor {
                rating: r.clone(),
                user_name: tables
                    .users
                    .get(&r.user_id)
                    .map(|u| u.name.clone())
                    .unwrap_or_default(),
            })
            .collect();
        ratings.sort_by(|a, b| {
            b.rating
                .created_at
                .cmp(&a.rating.created_at)
                .then(b.rating.id.cmp(&a.rating.id))
        });
        Ok(ratings)
    }
}

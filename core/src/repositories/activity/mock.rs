//! Mock implementation of ActivityRepository for testing

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::engagement::{ProductView, UserFavorite};
use crate::errors::DomainError;
use crate::repositories::memory::MockDatabase;

use super::trait_::ActivityRepository;

#[derive(Debug, Clone, Default)]
pub struct MockActivityRepository {
    db: MockDatabase,
}

impl MockActivityRepository {
    pub fn new(db: MockDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityRepository for MockActivityRepository {
    async fn add_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError> {
        let mut tables = self.db.tables.write().await;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.product_id == product_id)
        {
            return Ok(false);
        }
        let id = tables.next_id();
        tables.favorites.push(UserFavorite {
            id,
            user_id,
            product_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn remove_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError> {
        let mut tables = self.db.tables.write().await;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.product_id == product_id));
        Ok(tables.favorites.len() < before)
    }

    async fn is_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.product_id == product_id))
    }

    async fn favorite_product_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        let tables = self.db.tables.read().await;
        let mut favorites: Vec<&UserFavorite> =
            tables.favorites.iter().filter(|f| f.user_id == user_id).collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(favorites.into_iter().map(|f| f.product_id).collect())
    }

    async fn record_view(&self, mut view: ProductView) -> Result<(), DomainError> {
        let mut tables = self.db.tables.write().await;
        if tables.fail_view_writes {
            return Err(DomainError::internal("view table unavailable"));
        }
        view.id = tables.next_id();
        tables.views.push(view);
        Ok(())
    }

    async fn views_by_user(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<ProductView>, DomainError> {
        let tables = self.db.tables.read().await;
        let mut views: Vec<ProductView> = tables
            .views
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        views.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at).then(b.id.cmp(&a.id)));
        views.truncate(limit as usize);
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_views_are_newest_first_and_bounded() {
        let repo = MockDatabase::new().activity();
        for product_id in 1..=5 {
            let mut view = ProductView::new(7, product_id);
            view.viewed_at = Utc::now() + chrono::Duration::seconds(product_id);
            repo.record_view(view).await.unwrap();
        }
        repo.record_view(ProductView::new(8, 1)).await.unwrap();

        let views = repo.views_by_user(7, 3).await.unwrap();

        let ids: Vec<i64> = views.iter().map(|v| v.product_id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }
}

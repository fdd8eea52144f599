//! Mock implementation of ProductRepository for testing

use async_trait::async_trait;

use crate::domain::entities::product::{Product, ProductPrice};
use crate::domain::value_objects::commands::{Page, ProductSearch};
use crate::domain::value_objects::read_models::ProductDetails;
use crate::errors::{DomainError, ProductError};
use crate::repositories::memory::MockDatabase;

use super::trait_::ProductRepository;

#[derive(Debug, Clone, Default)]
pub struct MockProductRepository {
    db: MockDatabase,
}

impl MockProductRepository {
    pub fn new(db: MockDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        Ok(self.db.tables.read().await.products.get(&id).cloned())
    }

    async fn find_details(&self, id: i64) -> Result<Option<ProductDetails>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables.products.get(&id).map(|p| tables.details(p)))
    }

    async fn find_details_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductDetails>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id))
            .map(|p| tables.details(p))
            .collect())
    }

    async fn find_by_store(
        &self,
        store_id: i64,
        page: Option<Page>,
    ) -> Result<Vec<ProductDetails>, DomainError> {
        let tables = self.db.tables.read().await;
        let products = tables.products_newest_first(|p| p.store_id == store_id);
        Ok(match page {
            Some(page) => products
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
            None => products,
        })
    }

    async fn search(&self, filters: &ProductSearch) -> Result<Vec<ProductDetails>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables.products_newest_first(|p| {
            filters.query.as_deref().map_or(true, |q| p.matches_text(q))
                && filters.store_id.map_or(true, |id| p.store_id == id)
                && filters
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category.eq_ignore_ascii_case(c))
                && filters.min_price.map_or(true, |min| p.price >= min)
                && filters.max_price.map_or(true, |max| p.price <= max)
        }))
    }

    async fn find_recent(&self, limit: u32) -> Result<Vec<ProductDetails>, DomainError> {
        let tables = self.db.tables.read().await;
        let mut products = tables.products_newest_first(|_| true);
        products.truncate(limit as usize);
        Ok(products)
    }

    async fn create_with_images(
        &self,
        mut product: Product,
        image_urls: Vec<String>,
    ) -> Result<Product, DomainError> {
        let mut tables = self.db.tables.write().await;
        if !tables.stores.contains_key(&product.store_id) {
            return Err(DomainError::not_found("Store"));
        }
        product.id = tables.next_id();
        tables.products.insert(product.id, product.clone());
        tables.add_price(&product);
        for url in image_urls {
            tables.add_image(product.id, url);
        }
        Ok(product)
    }

    async fn update_with_images(
        &self,
        product: &Product,
        price_changed: bool,
        new_image_urls: Vec<String>,
    ) -> Result<(), DomainError> {
        let mut tables = self.db.tables.write().await;
        match tables.products.get_mut(&product.id) {
            Some(existing) => *existing = product.clone(),
            None => return Err(ProductError::NotFound.into()),
        }
        if price_changed {
            tables.add_price(product);
        }
        for url in new_image_urls {
            tables.add_image(product.id, url);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.db.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(false);
        }
        tables.remove_product(id);
        Ok(true)
    }

    async fn price_history(&self, product_id: i64) -> Result<Vec<ProductPrice>, DomainError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .prices
            .iter()
            .filter(|p| p.product_id == product_id)
            .cloned()
            .collect())
    }
}

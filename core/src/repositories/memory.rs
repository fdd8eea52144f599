//! Shared in-memory tables backing the mock repositories.
//!
//! All mock repositories created from one [`MockDatabase`] see the same data,
//! so cross-aggregate writes (store creation linking the owner, cascading
//! deletes) behave the way the MySQL implementation does.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entities::engagement::{ProductRating, ProductView, UserFavorite};
use crate::domain::entities::product::{Product, ProductImage, ProductPrice};
use crate::domain::entities::store::Store;
use crate::domain::entities::user::User;
use crate::domain::value_objects::read_models::{ProductDetails, RatingSummary};

use super::activity::MockActivityRepository;
use super::product::MockProductRepository;
use super::rating::MockRatingRepository;
use super::store::MockStoreRepository;
use super::user::MockUserRepository;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<i64, User>,
    pub stores: BTreeMap<i64, Store>,
    pub products: BTreeMap<i64, Product>,
    pub images: Vec<ProductImage>,
    pub prices: Vec<ProductPrice>,
    pub ratings: Vec<ProductRating>,
    pub favorites: Vec<UserFavorite>,
    pub views: Vec<ProductView>,
    pub fail_view_writes: bool,
    next_id: i64,
}

impl Tables {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_image(&mut self, product_id: i64, image_url: String) {
        let display_order = self
            .images
            .iter()
            .filter(|image| image.product_id == product_id)
            .count() as i32;
        let id = self.next_id();
        self.images.push(ProductImage {
            id,
            product_id,
            image_url,
            display_order,
            created_at: Utc::now(),
        });
    }

    pub fn add_price(&mut self, product: &Product) {
        let id = self.next_id();
        self.prices.push(ProductPrice {
            id,
            product_id: product.id,
            price: product.price,
            created_at: Utc::now(),
        });
    }

    pub fn remove_product(&mut self, product_id: i64) {
        self.products.remove(&product_id);
        self.images.retain(|i| i.product_id != product_id);
        self.prices.retain(|p| p.product_id != product_id);
        self.ratings.retain(|r| r.product_id != product_id);
        self.favorites.retain(|f| f.product_id != product_id);
        self.views.retain(|v| v.product_id != product_id);
    }

    pub fn details(&self, product: &Product) -> ProductDetails {
        let mut images: Vec<ProductImage> = self
            .images
            .iter()
            .filter(|image| image.product_id == product.id)
            .cloned()
            .collect();
        images.sort_by_key(|image| image.display_order);

        let scores: Vec<i32> = self
            .ratings
            .iter()
            .filter(|r| r.product_id == product.id)
            .map(|r| r.rating)
            .collect();

        let store = self.stores.get(&product.store_id);

        ProductDetails {
            product: product.clone(),
            images,
            store_name: store.map(|s| s.name.clone()).unwrap_or_default(),
            store_logo_url: store.and_then(|s| s.logo_url.clone()),
            rating: RatingSummary::from_ratings(&scores),
            is_favorite: false,
        }
    }

    /// Products newest first; ids break ties between equal timestamps
    pub fn products_newest_first(&self, filter: impl Fn(&Product) -> bool) -> Vec<ProductDetails> {
        let mut products: Vec<&Product> = self.products.values().filter(|p| filter(*p)).collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        products.into_iter().map(|p| self.details(p)).collect()
    }
}

/// Handle to a set of in-memory tables; cheap to clone
#[derive(Debug, Clone, Default)]
pub struct MockDatabase {
    pub(crate) tables: Arc<RwLock<Tables>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> MockUserRepository {
        MockUserRepository::new(self.clone())
    }

    pub fn stores(&self) -> MockStoreRepository {
        MockStoreRepository::new(self.clone())
    }

    pub fn products(&self) -> MockProductRepository {
        MockProductRepository::new(self.clone())
    }

    pub fn ratings(&self) -> MockRatingRepository {
        MockRatingRepository::new(self.clone())
    }

    pub fn activity(&self) -> MockActivityRepository {
        MockActivityRepository::new(self.clone())
    }

    /// Makes `record_view` fail, to exercise best-effort paths
    pub async fn fail_view_writes(&self, fail: bool) {
        self.tables.write().await.fail_view_writes = fail;
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn view_count(&self) -> usize {
        self.tables.read().await.views.len()
    }

    pub async fn rating_count(&self) -> usize {
        self.tables.read().await.ratings.len()
    }

    /// Insert a view with an explicit timestamp offset (seconds in the past)
    pub async fn seed_view(&self, user_id: i64, product_id: i64, seconds_ago: i64) {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.views.push(ProductView {
            id,
            user_id,
            product_id,
            viewed_at: Utc::now() - chrono::Duration::seconds(seconds_ago),
        });
    }
}

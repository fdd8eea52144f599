//! Product service implementation

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use sh_shared::types::{ApiResponse, Patch};
use uuid::Uuid;

use crate::domain::entities::engagement::{ProductRating, ProductView, RatingWithAuthor};
use crate::domain::entities::product::{Product, ProductPrice};
use crate::domain::value_objects::commands::{NewProduct, NewRating, ProductSearch, ProductUpdate};
use crate::domain::value_objects::read_models::ProductDetails;
use crate::domain::value_objects::request_context::RequestContext;
use crate::errors::{DomainResult, ProductError, ValidationError};
use crate::repositories::{
    ActivityRepository, ProductRepository, RatingRepository, StoreRepository,
};
use crate::services::external::ImageStorage;

/// Distinct products returned by the view history
pub const VIEW_HISTORY_LIMIT: usize = 50;

/// Raw view rows read per history request
const VIEW_HISTORY_SCAN: u32 = 50 * VIEW_HISTORY_LIMIT as u32;

/// Products returned by recommendations
pub const RECOMMENDATION_LIMIT: usize = 20;

/// Products returned by the on-sale listing
pub const ON_SALE_LIMIT: u32 = 50;

/// Images accepted per create or update request
pub const MAX_PRODUCT_IMAGES: usize = 10;

const MAX_SALE_PERCENT: i32 = 100;

pub struct ProductService {
    product_repository: Arc<dyn ProductRepository>,
    store_repository: Arc<dyn StoreRepository>,
    rating_repository: Arc<dyn RatingRepository>,
    activity_repository: Arc<dyn ActivityRepository>,
    image_storage: Arc<dyn ImageStorage>,
}

impl ProductService {
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        store_repository: Arc<dyn StoreRepository>,
        rating_repository: Arc<dyn RatingRepository>,
        activity_repository: Arc<dyn ActivityRepository>,
        image_storage: Arc<dyn ImageStorage>,
    ) -> Self {
        Self {
            product_repository,
            store_repository,
            rating_repository,
            activity_repository,
            image_storage,
        }
    }

    /// Create a product in the caller's store.
    ///
    /// Images are uploaded one by one before the insert; failed uploads are
    /// skipped, so a product may be created with fewer images (or none).
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        command: NewProduct,
    ) -> DomainResult<ApiResponse<ProductDetails>> {
        let user_id = ctx.user_id()?;
        let store = self
            .store_repository
            .find_by_user_id(user_id)
            .await?
            .ok_or(ProductError::StoreRequired)?;

        if command.name.trim().is_empty() {
            return Err(ValidationError::required("Name").into());
        }
        if command.category.trim().is_empty() {
            return Err(ValidationError::required("Category").into());
        }
        validate_price(command.price)?;
        validate_sale_percent(command.sale_percent)?;
        validate_image_count(command.images.len())?;

        let mut product = Product::new(
            store.id,
            command.name.trim(),
            command.category.trim(),
            command.price,
        );
        product.name_arabic = command.name_arabic;
        product.sale_percent = command.sale_percent;
        product.brand = command.brand;
        product.category_arabic = command.category_arabic;
        product.description = command.description;
        product.description_arabic = command.description_arabic;
        product.source_url = command.source_url;

        let image_urls = self.upload_images(ctx, store.id, &command.images).await;
        let product = self
            .product_repository
            .create_with_images(product, image_urls)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id,
            store_id = store.id,
            product_id = product.id,
            "Product created"
        );

        let details = self.details_or_not_found(product.id).await?;
        Ok(ApiResponse::created(details, "Product created successfully"))
    }

    /// Sparse update of a product in the caller's store.
    ///
    /// A price change appends a price-history row; new images are appended
    /// after the existing ones.
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        product_id: i64,
        update: ProductUpdate,
    ) -> DomainResult<ApiResponse<ProductDetails>> {
        let user_id = ctx.user_id()?;
        let mut product = self
            .product_repository
            .find_by_id(product_id)
            .await?
            .ok_or(ProductError::NotFound)?;

        if !self.owns_store(user_id, product.store_id).await? {
            tracing::info!(request_id = %ctx.request_id, user_id, product_id, "Product update rejected: not owner");
            return Err(ProductError::NotAuthorizedToUpdate.into());
        }

        let mut price_changed = false;
        if let Patch::Present(price) = update.price {
            validate_price(price)?;
            if price != product.price {
                product.price = price;
                price_changed = true;
            }
        }
        if let Patch::Present(sale_percent) = update.sale_percent {
            validate_sale_percent(sale_percent)?;
            product.sale_percent = sale_percent;
        }
        validate_image_count(update.new_images.len())?;

        update.name.non_blank().apply_to(&mut product.name);
        update.category.non_blank().apply_to(&mut product.category);
        update
            .name_arabic
            .non_blank()
            .apply_to_option(&mut product.name_arabic);
        update.brand.non_blank().apply_to_option(&mut product.brand);
        update
            .category_arabic
            .non_blank()
            .apply_to_option(&mut product.category_arabic);
        update
            .description
            .non_blank()
            .apply_to_option(&mut product.description);
        update
            .description_arabic
            .non_blank()
            .apply_to_option(&mut product.description_arabic);
        update
            .source_url
            .non_blank()
            .apply_to_option(&mut product.source_url);
        product.touch();

        let image_urls = self
            .upload_images(ctx, product.store_id, &update.new_images)
            .await;
        self.product_repository
            .update_with_images(&product, price_changed, image_urls)
            .await?;

        tracing::info!(request_id = %ctx.request_id, user_id, product_id, price_changed, "Product updated");

        let details = self.details_or_not_found(product_id).await?;
        Ok(ApiResponse::success(details, "Product updated successfully"))
    }

    pub async fn delete_product(
        &self,
        ctx: &RequestContext,
        product_id: i64,
    ) -> DomainResult<ApiResponse<()>> {
        let user_id = ctx.user_id()?;
        let product = self
            .product_repository
            .find_by_id(product_id)
            .await?
            .ok_or(ProductError::NotFound)?;

        if !self.owns_store(user_id, product.store_id).await? {
            tracing::info!(request_id = %ctx.request_id, user_id, product_id, "Product delete rejected: not owner");
            return Err(ProductError::NotAuthorizedToDelete.into());
        }

        if !self.product_repository.delete(product_id).await? {
            return Err(ProductError::NotFound.into());
        }

        tracing::info!(request_id = %ctx.request_id, user_id, product_id, "Product deleted");
        Ok(ApiResponse::success((), "Product deleted successfully"))
    }

    /// Product details. Authenticated callers also get a (best-effort) view
    /// recorded and `is_favorite` filled in.
    pub async fn get_product(
        &self,
        ctx: &RequestContext,
        product_id: i64,
    ) -> DomainResult<ApiResponse<ProductDetails>> {
        let mut details = self.details_or_not_found(product_id).await?;

        if let Some(user_id) = ctx.optional_user_id() {
            self.record_view(ctx, user_id, product_id).await;
            details.is_favorite = self
                .activity_repository
                .is_favorite(user_id, product_id)
                .await?;
        }

        Ok(ApiResponse::success(details, "Product retrieved successfully"))
    }

    /// All products of a store, newest first
    pub async fn get_products_by_store(
        &self,
        _ctx: &RequestContext,
        store_id: i64,
    ) -> DomainResult<ApiResponse<Vec<ProductDetails>>> {
        let products = self.product_repository.find_by_store(store_id, None).await?;
        Ok(ApiResponse::success(products, "Products retrieved successfully"))
    }

    /// Filtered search, newest first
    pub async fn search_products(
        &self,
        ctx: &RequestContext,
        mut filters: ProductSearch,
    ) -> DomainResult<ApiResponse<Vec<ProductDetails>>> {
        filters.query = filters
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        filters.category = filters
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let products = self.product_repository.search(&filters).await?;
        tracing::debug!(request_id = %ctx.request_id, results = products.len(), "Product search");
        Ok(ApiResponse::success(products, "Products retrieved successfully"))
    }

    /// Idempotent: adding an existing favorite succeeds with a different message
    pub async fn add_to_favorites(
        &self,
        ctx: &RequestContext,
        product_id: i64,
    ) -> DomainResult<ApiResponse<()>> {
        let user_id = ctx.user_id()?;
        self.ensure_product_exists(product_id).await?;

        let added = self
            .activity_repository
            .add_favorite(user_id, product_id)
            .await?;
        let message = if added {
            "Product added to favorites"
        } else {
            "Product is already in favorites"
        };
        Ok(ApiResponse::success((), message))
    }

    /// Idempotent: removing a missing favorite succeeds with a different message
    pub async fn remove_from_favorites(
        &self,
        ctx: &RequestContext,
        product_id: i64,
    ) -> DomainResult<ApiResponse<()>> {
        let user_id = ctx.user_id()?;
        let removed = self
            .activity_repository
            .remove_favorite(user_id, product_id)
            .await?;
        let message = if removed {
            "Product removed from favorites"
        } else {
            "Product is not in favorites"
        };
        Ok(ApiResponse::success((), message))
    }

    /// The caller's favorites, most recently added first
    pub async fn get_favorite_products(
        &self,
        ctx: &RequestContext,
    ) -> DomainResult<ApiResponse<Vec<ProductDetails>>> {
        let user_id = ctx.user_id()?;
        let ids = self.activity_repository.favorite_product_ids(user_id).await?;
        let mut products = self.details_in_order(&ids).await?;
        for product in &mut products {
            product.is_favorite = true;
        }
        Ok(ApiResponse::success(products, "Favorite products retrieved successfully"))
    }

    /// Record a view; persistence failures are logged and reported as success
    pub async fn add_product_view(
        &self,
        ctx: &RequestContext,
        product_id: i64,
    ) -> DomainResult<ApiResponse<()>> {
        let user_id = ctx.user_id()?;
        if self.record_view(ctx, user_id, product_id).await {
            Ok(ApiResponse::success((), "Product view added successfully"))
        } else {
            Ok(ApiResponse::success((), "Product view not recorded, but continuing"))
        }
    }

    /// Up to 50 distinct products, most recently viewed first
    pub async fn get_view_history(
        &self,
        ctx: &RequestContext,
    ) -> DomainResult<ApiResponse<Vec<ProductDetails>>> {
        let user_id = ctx.user_id()?;
        let views = self
            .activity_repository
            .views_by_user(user_id, VIEW_HISTORY_SCAN)
            .await?;
        let ids = recent_distinct_products(views, VIEW_HISTORY_LIMIT);
        let products = self.details_in_order(&ids).await?;
        Ok(ApiResponse::success(products, "View history retrieved successfully"))
    }

    /// Insert or replace the caller's rating of a product
    pub async fn rate_product(
        &self,
        ctx: &RequestContext,
        product_id: i64,
        command: NewRating,
    ) -> DomainResult<ApiResponse<ProductRating>> {
        let user_id = ctx.user_id()?;
        self.ensure_product_exists(product_id).await?;

        let rating = ProductRating::new(product_id, user_id, command.rating, command.comment)?;
        let rating = self.rating_repository.upsert(rating).await?;

        tracing::info!(request_id = %ctx.request_id, user_id, product_id, rating = rating.rating, "Product rated");
        Ok(ApiResponse::success(rating, "Product rating added successfully"))
    }

    /// Ratings with reviewer names, newest first
    pub async fn get_product_ratings(
        &self,
        _ctx: &RequestContext,
        product_id: i64,
    ) -> DomainResult<ApiResponse<Vec<RatingWithAuthor>>> {
        self.ensure_product_exists(product_id).await?;
        let ratings = self.rating_repository.find_by_product(product_id).await?;
        Ok(ApiResponse::success(ratings, "Product ratings retrieved successfully"))
    }

    /// Naive recommendations: the caller's favorites, or the newest products
    /// when there are none
    pub async fn get_recommended_products(
        &self,
        ctx: &RequestContext,
    ) -> DomainResult<ApiResponse<Vec<ProductDetails>>> {
        let user_id = ctx.user_id()?;
        let mut favorite_ids = self.activity_repository.favorite_product_ids(user_id).await?;

        let products = if favorite_ids.is_empty() {
            self.product_repository
                .find_recent(RECOMMENDATION_LIMIT as u32)
                .await?
        } else {
            favorite_ids.truncate(RECOMMENDATION_LIMIT);
            let mut products = self.details_in_order(&favorite_ids).await?;
            for product in &mut products {
                product.is_favorite = true;
            }
            products
        };

        Ok(ApiResponse::success(products, "Recommended products retrieved successfully"))
    }

    /// The 50 most recent products; the sale percentage is not filtered on
    pub async fn get_on_sale_products(
        &self,
        _ctx: &RequestContext,
    ) -> DomainResult<ApiResponse<Vec<ProductDetails>>> {
        let products = self.product_repository.find_recent(ON_SALE_LIMIT).await?;
        Ok(ApiResponse::success(products, "On-sale products retrieved successfully"))
    }

    /// Price snapshots of a product, oldest first
    pub async fn get_price_history(
        &self,
        _ctx: &RequestContext,
        product_id: i64,
    ) -> DomainResult<ApiResponse<Vec<ProductPrice>>> {
        self.ensure_product_exists(product_id).await?;
        let prices = self.product_repository.price_history(product_id).await?;
        Ok(ApiResponse::success(prices, "Price history retrieved successfully"))
    }

    async fn owns_store(&self, user_id: i64, store_id: i64) -> DomainResult<bool> {
        Ok(self
            .store_repository
            .find_by_user_id(user_id)
            .await?
            .map(|store| store.id == store_id)
            .unwrap_or(false))
    }

    async fn ensure_product_exists(&self, product_id: i64) -> DomainResult<()> {
        self.product_repository
            .find_by_id(product_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ProductError::NotFound.into())
    }

    async fn details_or_not_found(&self, product_id: i64) -> DomainResult<ProductDetails> {
        self.product_repository
            .find_details(product_id)
            .await?
            .ok_or_else(|| ProductError::NotFound.into())
    }

    /// Details for `ids` in the same order; deleted products are skipped
    async fn details_in_order(&self, ids: &[i64]) -> DomainResult<Vec<ProductDetails>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut by_id: HashMap<i64, ProductDetails> = self
            .product_repository
            .find_details_by_ids(ids)
            .await?
            .into_iter()
            .map(|details| (details.product.id, details))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Returns whether the view was stored
    async fn record_view(&self, ctx: &RequestContext, user_id: i64, product_id: i64) -> bool {
        match self
            .activity_repository
            .record_view(ProductView::new(user_id, product_id))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(request_id = %ctx.request_id, user_id, product_id, error = %e, "Product view not recorded");
                false
            }
        }
    }

    async fn upload_images(
        &self,
        ctx: &RequestContext,
        store_id: i64,
        images: &[String],
    ) -> Vec<String> {
        let batch = Uuid::new_v4().simple().to_string();
        let mut urls = Vec::with_capacity(images.len());

        for (index, data) in images.iter().enumerate() {
            if data.trim().is_empty() {
                continue;
            }
            let logical_name = format!("products/{store_id}/{batch}-{index}");
            match self.image_storage.upload_base64(data, &logical_name).await {
                Ok(url) => urls.push(url),
                Err(e) => {
                    tracing::warn!(request_id = %ctx.request_id, store_id, index, error = %e, "Product image upload failed")
                }
            }
        }

        urls
    }
}

/// Product ids from views (most recent first), first occurrence wins
fn recent_distinct_products(views: Vec<ProductView>, limit: usize) -> Vec<i64> {
    let mut views = views;
    views.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));

    let mut seen = HashSet::new();
    views
        .into_iter()
        .map(|view| view.product_id)
        .filter(|id| seen.insert(*id))
        .take(limit)
        .collect()
}

fn validate_price(price: Decimal) -> DomainResult<()> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NotPositive {
            field: "Price".to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_sale_percent(sale_percent: i32) -> DomainResult<()> {
    if !(0..=MAX_SALE_PERCENT).contains(&sale_percent) {
        return Err(ValidationError::OutOfRange {
            field: "SalePercent".to_string(),
            min: 0,
            max: i64::from(MAX_SALE_PERCENT),
        }
        .into());
    }
    Ok(())
}

fn validate_image_count(count: usize) -> DomainResult<()> {
    if count > MAX_PRODUCT_IMAGES {
        return Err(ValidationError::OutOfRange {
            field: "Images".to_string(),
            min: 0,
            max: MAX_PRODUCT_IMAGES as i64,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn view(product_id: i64, seconds_ago: i64) -> ProductView {
        ProductView {
            id: 0,
            user_id: 1,
            product_id,
            viewed_at: Utc::now() - Duration::seconds(seconds_ago),
        }
    }

    #[test]
    fn test_recent_distinct_products_dedupes_after_sorting() {
        // Unsorted input; product 1 was viewed long ago and again just now
        let views = vec![view(1, 500), view(2, 100), view(1, 5), view(3, 50)];

        assert_eq!(recent_distinct_products(views, 50), vec![1, 3, 2]);
    }

    #[test]
    fn test_recent_distinct_products_caps_result() {
        let views: Vec<ProductView> = (0..80).map(|i| view(i, i)).collect();

        let ids = recent_distinct_products(views, 50);

        assert_eq!(ids.len(), 50);
        assert_eq!(ids[0], 0);
    }

    #[test]
    fn test_price_and_sale_validation() {
        assert!(validate_price(Decimal::new(1, 2)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_err());
        assert!(validate_sale_percent(0).is_ok());
        assert!(validate_sale_percent(100).is_ok());
        assert!(validate_sale_percent(101).is_err());
        assert!(validate_sale_percent(-1).is_err());
    }
}

//! MySQL implementation of the ProductRepository trait.
//!
//! Listing queries return [`ProductDetails`]: the product row joined with its
//! store and rating aggregates, plus its images loaded in a second query.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use sh_core::domain::entities::product::{Product, ProductImage, ProductPrice};
use sh_core::domain::value_objects::commands::{Page, ProductSearch};
use sh_core::domain::value_objects::read_models::{ProductDetails, RatingSummary};
use sh_core::errors::{DomainError, ProductError};
use sh_core::repositories::ProductRepository;

use super::{column, contains_pattern, db_error};

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.store_id, p.name, p.name_arabic, p.price, p.sale_percent, p.brand,
    p.category, p.category_arabic, p.description, p.description_arabic,
    p.source_url, p.created_at, p.updated_at
"#;

const DETAILS_SELECT: &str = r#"
    SELECT
        p.id, p.store_id, p.name, p.name_arabic, p.price, p.sale_percent, p.brand,
        p.category, p.category_arabic, p.description, p.description_arabic,
        p.source_url, p.created_at, p.updated_at,
        s.name AS store_name,
        s.logo_url AS store_logo_url,
        (SELECT COALESCE(AVG(r.rating), 0) FROM product_ratings r WHERE r.product_id = p.id)
            AS average_rating,
        (SELECT COUNT(*) FROM product_ratings r WHERE r.product_id = p.id) AS rating_count
    FROM products p
    JOIN stores s ON s.id = p.store_id
"#;

const NEWEST_FIRST: &str = " ORDER BY p.created_at DESC, p.id DESC";

/// MySQL implementation of ProductRepository
pub struct MySqlProductRepository {
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &MySqlRow) -> Result<Product, DomainError> {
        Ok(Product {
            id: column(row, "id")?,
            store_id: column(row, "store_id")?,
            name: column(row, "name")?,
            name_arabic: column(row, "name_arabic")?,
            price: column(row, "price")?,
            sale_percent: column(row, "sale_percent")?,
            brand: column(row, "brand")?,
            category: column(row, "category")?,
            category_arabic: column(row, "category_arabic")?,
            description: column(row, "description")?,
            description_arabic: column(row, "description_arabic")?,
            source_url: column(row, "source_url")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }

    /// Details without images; those are attached by [`Self::with_images`]
    fn row_to_details(row: &MySqlRow) -> Result<ProductDetails, DomainError> {
        let average: Decimal = column(row, "average_rating")?;
        Ok(ProductDetails {
            product: Self::row_to_product(row)?,
            images: Vec::new(),
            store_name: column(row, "store_name")?,
            store_logo_url: column(row, "store_logo_url")?,
            rating: RatingSummary {
                average: average.to_f64().unwrap_or(0.0),
                count: column(row, "rating_count")?,
            },
            is_favorite: false,
        })
    }

    fn row_to_image(row: &MySqlRow) -> Result<ProductImage, DomainError> {
        Ok(ProductImage {
            id: column(row, "id")?,
            product_id: column(row, "product_id")?,
            image_url: column(row, "image_url")?,
            display_order: column(row, "display_order")?,
            created_at: column(row, "created_at")?,
        })
    }

    async fn with_images(
        &self,
        mut details: Vec<ProductDetails>,
    ) -> Result<Vec<ProductDetails>, DomainError> {
        if details.is_empty() {
            return Ok(details);
        }

        let mut query = QueryBuilder::<MySql>::new(
            "SELECT id, product_id, image_url, display_order, created_at \
             FROM product_images WHERE product_id IN (",
        );
        let mut ids = query.separated(", ");
        for d in &details {
            ids.push_bind(d.product.id);
        }
        query.push(") ORDER BY product_id, display_order, id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load product images"))?;

        let mut images: HashMap<i64, Vec<ProductImage>> = HashMap::new();
        for row in &rows {
            let image = Self::row_to_image(row)?;
            images.entry(image.product_id).or_default().push(image);
        }
        for d in &mut details {
            d.images = images.remove(&d.product.id).unwrap_or_default();
        }
        Ok(details)
    }

    async fn fetch_details(
        &self,
        mut query: QueryBuilder<'_, MySql>,
        context: &'static str,
    ) -> Result<Vec<ProductDetails>, DomainError> {
        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(context))?;

        let details = rows
            .iter()
            .map(Self::row_to_details)
            .collect::<Result<Vec<_>, _>>()?;
        self.with_images(details).await
    }

    async fn insert_price(
        tx: &mut Transaction<'_, MySql>,
        product_id: i64,
        price: Decimal,
    ) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO product_prices (product_id, price, created_at) VALUES (?, ?, ?)")
            .bind(product_id)
            .bind(price)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to record product price"))?;
        Ok(())
    }

    /// Appends images after the product's current last display position
    async fn append_images(
        tx: &mut Transaction<'_, MySql>,
        product_id: i64,
        image_urls: Vec<String>,
    ) -> Result<(), DomainError> {
        if image_urls.is_empty() {
            return Ok(());
        }

        let next_order: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(display_order) + 1, 0) FROM product_images WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(db_error("Failed to read image order"))?;

        let now = Utc::now();
        let mut query = QueryBuilder::<MySql>::new(
            "INSERT INTO product_images (product_id, image_url, display_order, created_at) ",
        );
        query.push_values(image_urls.into_iter().enumerate(), |mut b, (i, url)| {
            b.push_bind(product_id)
                .push_bind(url)
                .push_bind(next_order as i32 + i as i32)
                .push_bind(now);
        });
        query
            .build()
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert product images"))?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let query = format!("SELECT {} FROM products p WHERE p.id = ? LIMIT 1", PRODUCT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find product"))?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn find_details(&self, id: i64) -> Result<Option<ProductDetails>, DomainError> {
        let mut query = QueryBuilder::new(DETAILS_SELECT);
        query.push(" WHERE p.id = ").push_bind(id);

        let mut details = self
            .fetch_details(query, "Failed to load product details")
            .await?;
        Ok(details.pop())
    }

    async fn find_details_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductDetails>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::new(DETAILS_SELECT);
        query.push(" WHERE p.id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        query.push(")");

        self.fetch_details(query, "Failed to load products by id").await
    }

    async fn find_by_store(
        &self,
        store_id: i64,
        page: Option<Page>,
    ) -> Result<Vec<ProductDetails>, DomainError> {
        let mut query = QueryBuilder::new(DETAILS_SELECT);
        query.push(" WHERE p.store_id = ").push_bind(store_id);
        query.push(NEWEST_FIRST);
        if let Some(page) = page {
            query
                .push(" LIMIT ")
                .push_bind(page.limit())
                .push(" OFFSET ")
                .push_bind(page.offset());
        }

        self.fetch_details(query, "Failed to list store products").await
    }

    async fn search(&self, filters: &ProductSearch) -> Result<Vec<ProductDetails>, DomainError> {
        let mut query = QueryBuilder::new(DETAILS_SELECT);
        query.push(" WHERE 1 = 1");

        if let Some(text) = &filters.query {
            let pattern = contains_pattern(text);
            query
                .push(" AND (LOWER(p.name) LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '!' OR LOWER(COALESCE(p.description, '')) LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '!' OR LOWER(COALESCE(p.brand, '')) LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '!')");
        }
        if let Some(store_id) = filters.store_id {
            query.push(" AND p.store_id = ").push_bind(store_id);
        }
        if let Some(category) = &filters.category {
            query
                .push(" AND LOWER(p.category) = ")
                .push_bind(category.to_lowercase());
        }
        if let Some(min) = filters.min_price {
            query.push(" AND p.price >= ").push_bind(min);
        }
        if let Some(max) = filters.max_price {
            query.push(" AND p.price <= ").push_bind(max);
        }
        query.push(NEWEST_FIRST);

        self.fetch_details(query, "Failed to search products").await
    }

    async fn find_recent(&self, limit: u32) -> Result<Vec<ProductDetails>, DomainError> {
        let mut query = QueryBuilder::new(DETAILS_SELECT);
        query.push(NEWEST_FIRST).push(" LIMIT ").push_bind(limit);

        self.fetch_details(query, "Failed to list recent products").await
    }

    /// Product, first price snapshot and images in one transaction
    async fn create_with_images(
        &self,
        mut product: Product,
        image_urls: Vec<String>,
    ) -> Result<Product, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let query = r#"
            INSERT INTO products (
                store_id, name, name_arabic, price, sale_percent, brand, category,
                category_arabic, description, description_arabic, source_url,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(product.store_id)
            .bind(&product.name)
            .bind(&product.name_arabic)
            .bind(product.price)
            .bind(product.sale_percent)
            .bind(&product.brand)
            .bind(&product.category)
            .bind(&product.category_arabic)
            .bind(&product.description)
            .bind(&product.description_arabic)
            .bind(&product.source_url)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to create product"))?;
        product.id = result.last_insert_id() as i64;

        Self::insert_price(&mut tx, product.id, product.price).await?;
        Self::append_images(&mut tx, product.id, image_urls).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit product creation"))?;
        Ok(product)
    }

    async fn update_with_images(
        &self,
        product: &Product,
        price_changed: bool,
        new_image_urls: Vec<String>,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let query = r#"
            UPDATE products SET
                name = ?,
                name_arabic = ?,
                price = ?,
                sale_percent = ?,
                brand = ?,
                category = ?,
                category_arabic = ?,
                description = ?,
                description_arabic = ?,
                source_url = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&product.name)
            .bind(&product.name_arabic)
            .bind(product.price)
            .bind(product.sale_percent)
            .bind(&product.brand)
            .bind(&product.category)
            .bind(&product.category_arabic)
            .bind(&product.description)
            .bind(&product.description_arabic)
            .bind(&product.source_url)
            .bind(product.updated_at)
            .bind(product.id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to update product"))?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound.into());
        }

        if price_changed {
            Self::insert_price(&mut tx, product.id, product.price).await?;
        }
        Self::append_images(&mut tx, product.id, new_image_urls).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit product update"))?;
        Ok(())
    }

    /// Images, prices, ratings, favorites and views go with it (FK cascade)
    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete product"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn price_history(&self, product_id: i64) -> Result<Vec<ProductPrice>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, product_id, price, created_at FROM product_prices \
             WHERE product_id = ? ORDER BY created_at, id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load price history"))?;

        rows.iter()
            .map(|row| {
                Ok(ProductPrice {
                    id: column(row, "id")?,
                    product_id: column(row, "product_id")?,
                    price: column(row, "price")?,
                    created_at: column(row, "created_at")?,
                })
            })
            .collect()
    }
}

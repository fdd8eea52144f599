use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use sh_core::domain::entities::engagement::{ProductRating, RatingWithAuthor};
use sh_core::domain::entities::product::{ProductImage, ProductPrice};
use sh_core::domain::value_objects::commands::{NewProduct, NewRating, ProductSearch, ProductUpdate};
use sh_core::domain::value_objects::read_models::ProductDetails;
use sh_shared::types::Patch;

fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some(Cow::from("Price must be greater than 0"));
        Err(err)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    pub name_arabic: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub description_arabic: Option<String>,

    #[validate(custom(function = "positive_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, max = 100, message = "Sale percent must be between 0 and 100"))]
    pub sale_percent: Option<i32>,

    #[validate(length(max = 100, message = "Brand must not exceed 100 characters"))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: String,

    pub category_arabic: Option<String>,

    pub source_url: Option<String>,

    /// Base64 images in display order
    #[serde(default)]
    #[validate(length(max = 10, message = "A product can have at most 10 images"))]
    pub images: Vec<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            name: request.name,
            name_arabic: request.name_arabic,
            price: request.price,
            sale_percent: request.sale_percent.unwrap_or(0),
            brand: request.brand,
            category: request.category,
            category_arabic: request.category_arabic,
            description: request.description,
            description_arabic: request.description_arabic,
            source_url: request.source_url,
            images: request.images,
        }
    }
}

/// Sparse product update; new images are appended after the existing ones
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(max = 200, message = "Name must not exceed 200 characters"))]
    pub name: Option<String>,

    pub name_arabic: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub description_arabic: Option<String>,

    #[validate(custom(function = "positive_price"))]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, max = 100, message = "Sale percent must be between 0 and 100"))]
    pub sale_percent: Option<i32>,

    #[validate(length(max = 100, message = "Brand must not exceed 100 characters"))]
    pub brand: Option<String>,

    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,

    pub category_arabic: Option<String>,

    pub source_url: Option<String>,

    #[serde(default)]
    #[validate(length(max = 10, message = "A product can have at most 10 images"))]
    pub new_images: Vec<String>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            name: Patch::from(request.name),
            name_arabic: Patch::from(request.name_arabic),
            price: Patch::from(request.price),
            sale_percent: Patch::from(request.sale_percent),
            brand: Patch::from(request.brand),
            category: Patch::from(request.category),
            category_arabic: Patch::from(request.category_arabic),
            description: Patch::from(request.description),
            description_arabic: Patch::from(request.description_arabic),
            source_url: Patch::from(request.source_url),
            new_images: request.new_images,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RateProductRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 1000, message = "Comment must not exceed 1000 characters"))]
    pub comment: Option<String>,
}

impl From<RateProductRequest> for NewRating {
    fn from(request: RateProductRequest) -> Self {
        Self {
            rating: request.rating,
            comment: request.comment.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchQuery {
    pub query: Option<String>,
    pub store_id: Option<i64>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl From<ProductSearchQuery> for ProductSearch {
    fn from(query: ProductSearchQuery) -> Self {
        Self {
            query: query.query,
            store_id: query.store_id,
            category: query.category,
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageDto {
    pub id: i64,
    pub image_url: String,
    pub is_main_image: bool,
    pub created_date: DateTime<Utc>,
}

impl ProductImageDto {
    fn new(image: ProductImage, is_main_image: bool) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url,
            is_main_image,
            created_date: image.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub name_arabic: Option<String>,
    pub description: Option<String>,
    pub description_arabic: Option<String>,
    pub current_price: Decimal,
    pub sale_percent: i32,
    /// Equals `current_price` when there is no sale
    pub final_price: Decimal,
    pub brand: Option<String>,
    pub category: String,
    pub category_arabic: Option<String>,
    pub source_url: Option<String>,
    pub images: Vec<ProductImageDto>,
    pub main_image: Option<String>,
    pub average_rating: f64,
    pub rating_count: i64,
    pub is_favorite: bool,
    pub store_id: i64,
    pub store_name: String,
    pub store_image_url: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl From<ProductDetails> for ProductDto {
    fn from(details: ProductDetails) -> Self {
        let main_image = details.main_image().map(str::to_string);
        let final_price = details.product.final_price();
        let product = details.product;

        Self {
            id: product.id,
            name: product.name,
            name_arabic: product.name_arabic,
            description: product.description,
            description_arabic: product.description_arabic,
            current_price: product.price,
            sale_percent: product.sale_percent,
            final_price,
            brand: product.brand,
            category: product.category,
            category_arabic: product.category_arabic,
            source_url: product.source_url,
            images: details
                .images
                .into_iter()
                .enumerate()
                .map(|(index, image)| ProductImageDto::new(image, index == 0))
                .collect(),
            main_image,
            average_rating: details.rating.average,
            rating_count: details.rating.count,
            is_favorite: details.is_favorite,
            store_id: product.store_id,
            store_name: details.store_name,
            store_image_url: details.store_logo_url,
            created_date: product.created_at,
            updated_date: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPriceDto {
    pub id: i64,
    pub price: Decimal,
    pub is_current_price: bool,
    pub created_date: DateTime<Utc>,
}

impl ProductPriceDto {
    /// Oldest first; the last snapshot is the current price
    pub fn history(prices: Vec<ProductPrice>) -> Vec<Self> {
        let last = prices.len().saturating_sub(1);
        prices
            .into_iter()
            .enumerate()
            .map(|(index, price)| Self {
                id: price.id,
                price: price.price,
                is_current_price: index == last,
                created_date: price.created_at,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRatingDto {
    pub id: i64,
    pub product_id: i64,
    pub rating: i32,
    pub review: Option<String>,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl From<ProductRating> for ProductRatingDto {
    fn from(rating: ProductRating) -> Self {
        Self {
            id: rating.id,
            product_id: rating.product_id,
            rating: rating.rating,
            review: rating.comment,
            user_id: rating.user_id,
            user_name: None,
            created_date: rating.created_at,
            updated_date: rating.updated_at,
        }
    }
}

impl From<RatingWithAuthor> for ProductRatingDto {
    fn from(entry: RatingWithAuthor) -> Self {
        Self {
            user_name: Some(entry.user_name),
            ..Self::from(entry.rating)
        }
    }
}

pub type CreateProductDto = CreateProductRequest;
pub type UpdateProductDto = UpdateProductRequest;
pub type CreateProductRatingDto = RateProductRequest;

//! Read models returned by services and mapped to DTOs by the api layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::product::{Product, ProductImage};
use crate::domain::entities::store::Store;
use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;

/// Result of a successful register or login
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub tokens: TokenPair,
    pub user: User,
}

/// Result of a refresh; only the access token is handed back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RatingSummary {
    /// 0.0 when there are no ratings
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }
        let total: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        Self {
            average: total as f64 / ratings.len() as f64,
            count: ratings.len() as i64,
        }
    }
}

/// Product with everything a listing or detail page shows
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub product: Product,
    /// Ordered by display order
    pub images: Vec<ProductImage>,
    pub store_name: String,
    pub store_logo_url: Option<String>,
    pub rating: RatingSummary,
    pub is_favorite: bool,
}

impl ProductDetails {
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(|image| image.image_url.as_str())
    }
}

/// Store with a page of its products
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDetails {
    pub store: Store,
    pub products: Vec<ProductDetails>,
}

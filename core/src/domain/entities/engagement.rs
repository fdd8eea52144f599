//! User engagement with products: ratings, favorites and views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ProductError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A user's rating of a product; one per (user, product)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRating {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductRating {
    /// Creates a rating, rejecting values outside 1..=5
    pub fn new(
        product_id: i64,
        user_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Self, ProductError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ProductError::InvalidRating);
        }
        Ok(Self {
            id: 0,
            product_id,
            user_id,
            rating,
            comment,
            created_at: Utc::now(),
            updated_at: None,
        })
    }
}

/// Rating joined with the reviewer's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingWithAuthor {
    pub rating: ProductRating,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFavorite {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A single product view; append-only, duplicates allowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub viewed_at: DateTime<Utc>,
}

impl ProductView {
    pub fn new(user_id: i64, product_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            product_id,
            viewed_at: Utc::now(),
        }
    }
}

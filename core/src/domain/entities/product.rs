//! Product entity with its images and append-only price history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub name_arabic: Option<String>,
    /// DECIMAL(10,2)
    pub price: Decimal,
    /// 0 means not on sale
    pub sale_percent: i32,
    pub brand: Option<String>,
    pub category: String,
    pub category_arabic: Option<String>,
    pub description: Option<String>,
    pub description_arabic: Option<String>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(
        store_id: i64,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: 0,
            store_id,
            name: name.into(),
            name_arabic: None,
            price,
            sale_percent: 0,
            brand: None,
            category: category.into(),
            category_arabic: None,
            description: None,
            description_arabic: None,
            source_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// `price × (1 − sale_percent/100)`, rounded to cents
    pub fn final_price(&self) -> Decimal {
        if self.sale_percent <= 0 {
            return self.price;
        }
        let discount = self.price * Decimal::from(self.sale_percent) / Decimal::ONE_HUNDRED;
        (self.price - discount).round_dp(2)
    }

    pub fn is_on_sale(&self) -> bool {
        self.sale_percent > 0
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Case-insensitive substring match over name, description and brand
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        let contains = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| v.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };
        self.name.to_lowercase().contains(&needle)
            || contains(&self.description)
            || contains(&self.brand)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub image_url: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Price snapshot. Rows are only ever inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: i64,
    pub product_id: i64,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

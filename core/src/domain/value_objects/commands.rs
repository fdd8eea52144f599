//! Input commands accepted by the services.
//!
//! Update commands are sparse: every field is a [`Patch`] and blank strings
//! have already been collapsed to `Absent`, so "blank" means "unchanged".

use rust_decimal::Decimal;
use sh_shared::types::Patch;

use crate::domain::entities::store::StoreType;

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone)]
pub struct ResetPassword {
    pub token: String,
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewStore {
    pub name: String,
    pub store_type: StoreType,
    pub category: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    /// Base64 image, optionally with a `data:` prefix
    pub logo: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StoreUpdate {
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub address: Patch<String>,
    pub phone: Patch<String>,
    pub category: Patch<String>,
    pub whatsapp_phone: Patch<String>,
    pub website_url: Patch<String>,
    pub facebook_url: Patch<String>,
    pub instagram_url: Patch<String>,
    pub logo: Patch<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub name_arabic: Option<String>,
    pub price: Decimal,
    pub sale_percent: i32,
    pub brand: Option<String>,
    pub category: String,
    pub category_arabic: Option<String>,
    pub description: Option<String>,
    pub description_arabic: Option<String>,
    pub source_url: Option<String>,
    /// Base64 images in display order
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Patch<String>,
    pub name_arabic: Patch<String>,
    pub price: Patch<Decimal>,
    pub sale_percent: Patch<i32>,
    pub brand: Patch<String>,
    pub category: Patch<String>,
    pub category_arabic: Patch<String>,
    pub description: Patch<String>,
    pub description_arabic: Patch<String>,
    pub source_url: Patch<String>,
    /// Base64 images appended after the existing ones
    pub new_images: Vec<String>,
}

/// Product search filters; all given filters are ANDed
#[derive(Debug, Clone, Default)]
pub struct ProductSearch {
    pub query: Option<String>,
    pub store_id: Option<i64>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Patch<String>,
    pub phone_number: Patch<String>,
    pub profile_image: Patch<String>,
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { number: 1, size: 20 }
    }
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_offset() {
        let page = Page::default();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 20);

        let third = Page::new(3, 20);
        assert_eq!(third.offset(), 40);

        let clamped = Page::new(0, 1000);
        assert_eq!(clamped.number, 1);
        assert_eq!(clamped.size, 100);
    }
}

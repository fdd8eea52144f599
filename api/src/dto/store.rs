use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use sh_core::domain::entities::store::{Store, StoreType};
use sh_core::domain::value_objects::commands::{NewStore, Page, StoreUpdate};
use sh_core::domain::value_objects::read_models::StoreDetails;
use sh_shared::types::Patch;

use super::product::ProductDto;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    /// Base64 logo, optionally with a `data:` prefix
    pub logo_base64: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    /// "local" (default) or "online"
    #[serde(rename = "type")]
    pub store_type: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: String,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 20, message = "Phone must not exceed 20 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 20, message = "WhatsApp phone must not exceed 20 characters"))]
    pub whatsapp_phone_number: Option<String>,

    #[validate(length(max = 200, message = "Website link must not exceed 200 characters"))]
    pub website_link: Option<String>,

    #[validate(length(max = 200, message = "Facebook link must not exceed 200 characters"))]
    pub facebook_link: Option<String>,

    #[validate(length(max = 200, message = "Instagram link must not exceed 200 characters"))]
    pub instagram_link: Option<String>,
}

impl From<CreateStoreRequest> for NewStore {
    fn from(request: CreateStoreRequest) -> Self {
        Self {
            name: request.name,
            store_type: request
                .store_type
                .as_deref()
                .map(StoreType::parse)
                .unwrap_or_default(),
            category: request.category,
            address: request.address,
            phone: request.phone,
            description: request.description,
            logo: request.logo_base64,
            whatsapp_phone: request.whatsapp_phone_number,
            facebook_url: request.facebook_link,
            instagram_url: request.instagram_link,
            website_url: request.website_link,
        }
    }
}

/// Sparse store update; omitted, null and blank fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    pub logo_base64: Option<String>,

    #[validate(length(max = 200, message = "Name must not exceed 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 20, message = "Phone must not exceed 20 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 20, message = "WhatsApp phone must not exceed 20 characters"))]
    pub whatsapp_phone_number: Option<String>,

    #[validate(length(max = 200, message = "Website link must not exceed 200 characters"))]
    pub website_link: Option<String>,

    #[validate(length(max = 200, message = "Facebook link must not exceed 200 characters"))]
    pub facebook_link: Option<String>,

    #[validate(length(max = 200, message = "Instagram link must not exceed 200 characters"))]
    pub instagram_link: Option<String>,
}

impl From<UpdateStoreRequest> for StoreUpdate {
    fn from(request: UpdateStoreRequest) -> Self {
        Self {
            name: Patch::from(request.name),
            description: Patch::from(request.description),
            address: Patch::from(request.address),
            phone: Patch::from(request.phone),
            category: Patch::from(request.category),
            whatsapp_phone: Patch::from(request.whatsapp_phone_number),
            website_url: Patch::from(request.website_link),
            facebook_url: Patch::from(request.facebook_link),
            instagram_url: Patch::from(request.instagram_link),
            logo: Patch::from(request.logo_base64),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub store_type: String,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub whatsapp_phone: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub website_url: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Store> for StoreDto {
    fn from(store: Store) -> Self {
        Self {
            store_type: store.store_type.as_str().to_string(),
            id: store.id,
            name: store.name,
            logo_url: store.logo_url,
            phone: store.phone,
            address: store.address,
            category: store.category,
            description: store.description,
            latitude: store.latitude,
            longitude: store.longitude,
            whatsapp_phone: store.whatsapp_phone,
            facebook_url: store.facebook_url,
            instagram_url: store.instagram_url,
            website_url: store.website_url,
            user_id: store.user_id,
            created_at: store.created_at,
        }
    }
}

/// A store with one page of its products
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePageDto {
    pub store: StoreDto,
    pub products_length: usize,
    pub products: Vec<ProductDto>,
}

impl From<StoreDetails> for StorePageDto {
    fn from(details: StoreDetails) -> Self {
        let products: Vec<ProductDto> = details.products.into_iter().map(ProductDto::from).collect();
        Self {
            store: StoreDto::from(details.store),
            products_length: products.len(),
            products,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePageQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl StorePageQuery {
    pub fn page(&self) -> Page {
        let defaults = Page::default();
        Page::new(
            self.page_number.unwrap_or(defaults.number),
            self.page_size.unwrap_or(defaults.size),
        )
    }
}

/// `GET /api/store/search`; geo filtering applies only when both coordinates are given
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSearchQuery {
    pub query: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStoresQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
}

pub type CreateStoreDto = CreateStoreRequest;
pub type UpdateStoreDto = UpdateStoreRequest;

//! Store entity. A user owns at most one store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::geo::Coordinates;

/// Physical or online-only store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Local,
    Online,
}

impl StoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Local => "local",
            StoreType::Online => "online",
        }
    }

    /// Anything other than "online" is a local store
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("online") {
            StoreType::Online
        } else {
            StoreType::Local
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub store_type: StoreType,
    pub category: String,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    /// DECIMAL(10,8)
    pub latitude: Option<Decimal>,
    /// DECIMAL(11,8)
    pub longitude: Option<Decimal>,
    pub whatsapp_phone: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Store {
    pub fn new(user_id: i64, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id,
            name: name.into(),
            store_type: StoreType::Local,
            category: category.into(),
            logo_url: None,
            address: None,
            phone: None,
            description: None,
            latitude: None,
            longitude: None,
            whatsapp_phone: None,
            facebook_url: None,
            instagram_url: None,
            website_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    /// Coordinates when both latitude and longitude are stored
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Coordinates::from_decimal(latitude, longitude),
            _ => None,
        }
    }

    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        let (latitude, longitude) = coordinates.to_decimal();
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Case-insensitive substring match over name, category and description
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

//! Configuration for external collaborators: image storage, geocoding, email

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

/// Image storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory where uploaded objects are written
    pub root: String,

    /// Public base URL the storage root is served under
    pub public_url: String,

    /// Bucket (top-level folder) for all SaleHunter images
    pub bucket: String,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: String::from("./storage"),
            public_url: String::from("http://localhost:8080/static"),
            bucket: String::from("salehunter"),
            timeout_secs: 15,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root: env_string("STORAGE_ROOT", &defaults.root),
            public_url: env_string("STORAGE_PUBLIC_URL", &defaults.public_url),
            bucket: env_string("STORAGE_BUCKET", &defaults.bucket),
            timeout_secs: env_or("STORAGE_TIMEOUT_SECS", defaults.timeout_secs),
        }
    }
}

/// Geocoding provider (Nominatim-compatible) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim API
    pub base_url: String,

    /// User agent required by the Nominatim usage policy
    pub user_agent: String,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://nominatim.openstreetmap.org"),
            user_agent: String::from("SaleHunter/1.0"),
            timeout_secs: 10,
        }
    }
}

impl GeocodingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_string("GEOCODING_BASE_URL", &defaults.base_url),
            user_agent: env_string("GEOCODING_USER_AGENT", &defaults.user_agent),
            timeout_secs: env_or("GEOCODING_TIMEOUT_SECS", defaults.timeout_secs),
        }
    }
}

/// SMTP configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    #[serde(skip_serializing)]
    pub smtp_password: String,
    /// Sender address, e.g. `SaleHunter <no-reply@salehunter.app>`
    pub from_address: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::from("localhost"),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: String::from("SaleHunter <no-reply@salehunter.app>"),
            timeout_secs: 15,
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            smtp_host: env_string("SMTP_HOST", &defaults.smtp_host),
            smtp_port: env_or("SMTP_PORT", defaults.smtp_port),
            smtp_username: env_string("SMTP_USERNAME", ""),
            smtp_password: env_string("SMTP_PASSWORD", ""),
            from_address: env_string("SMTP_FROM", &defaults.from_address),
            timeout_secs: env_or("SMTP_TIMEOUT_SECS", defaults.timeout_secs),
        }
    }
}

/// Public application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppSettings {
    /// Base URL of the web client; reset links are `{base_url}ResetPassword?token=...`
    pub base_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:3000/"),
        }
    }
}

impl AppSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: env_string("APP_BASE_URL", &Self::default().base_url),
        }
    }
}

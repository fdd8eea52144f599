//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - JWT signing and token lifetimes
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `external` - Image storage, geocoding, email and public app settings
//! - `server` - HTTP server binding

pub mod auth;
pub mod database;
pub mod environment;
pub mod external;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use external::{AppSettings, EmailConfig, GeocodingConfig, StorageConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Image storage configuration
    pub storage: StorageConfig,

    /// Geocoding provider configuration
    pub geocoding: GeocodingConfig,

    /// Outgoing email configuration
    pub email: EmailConfig,

    /// Public application settings (links in emails)
    pub app: AppSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            storage: StorageConfig::default(),
            geocoding: GeocodingConfig::default(),
            email: EmailConfig::default(),
            app: AppSettings::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
            geocoding: GeocodingConfig::from_env(),
            email: EmailConfig::from_env(),
            app: AppSettings::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Check settings that must never reach production unchanged
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.jwt.access_token_expiry_minutes <= 0 || self.jwt.refresh_token_expiry_days <= 0 {
            return Err("Token lifetimes must be positive".to_string());
        }
        Ok(())
    }
}

/// Read and parse an environment variable, falling back to `default`
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Read a string environment variable, falling back to `default`
pub(crate) fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

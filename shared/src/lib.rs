//! Shared utilities and common types for the SaleHunter server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The uniform `{code, message, data}` response envelope
//! - The `Patch<T>` wrapper used by sparse updates
//! - Validation helpers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AppSettings, DatabaseConfig, EmailConfig, Environment, GeocodingConfig, JwtConfig,
    LoggingConfig, ServerConfig, StorageConfig,
};
pub use types::{response_codes, ApiResponse, HealthResponse, Patch};
pub use utils::validation;

//! # Infrastructure Layer
//!
//! Concrete implementations of the repository and collaborator traits
//! declared in `sh_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL repositories using SQLx, with embedded migrations
//! - **Security**: bcrypt password hashing
//! - **Storage**: local-disk image storage served under a public URL
//! - **Geocoding**: Nominatim client over reqwest
//! - **Email**: SMTP delivery with lettre
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use sh_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Outbound email over SMTP
pub mod email;

/// Address geocoding against a Nominatim-compatible API
pub mod geocoding;

/// Password hashing
pub mod security;

/// Image storage
pub mod storage;

pub use email::SmtpEmailSender;
pub use geocoding::NominatimGeocoder;
pub use security::BcryptPasswordHasher;
pub use storage::LocalImageStorage;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error from image storage
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMTP delivery error
    #[error("Email error: {0}")]
    Email(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Http(e) => DomainError::external("http", e.to_string()),
            InfrastructureError::Email(message) => DomainError::external("email", message),
            other => DomainError::internal(other.to_string()),
        }
    }
}

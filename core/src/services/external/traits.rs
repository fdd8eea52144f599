//! Traits for external collaborator integration

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::domain::value_objects::geo::Coordinates;
use crate::errors::DomainResult;

/// Outcome of checking a password against a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerification {
    Match,
    Mismatch,
}

impl PasswordVerification {
    pub fn is_match(self) -> bool {
        self == PasswordVerification::Match
    }
}

/// Salted one-way password hashing
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` for `user`
    async fn hash(&self, user: &User, password: &str) -> DomainResult<String>;

    /// Check `password` against `hash`; a malformed hash is a mismatch
    async fn verify(&self, user: &User, hash: &str, password: &str) -> PasswordVerification;
}

/// Object storage for images.
///
/// Logical names may contain `/` (e.g. `stores/12/main`); the storage picks
/// the file extension from the content.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Decode a base64 image (a `data:*;base64,` prefix is allowed) and store it.
    /// Returns the public URL.
    async fn upload_base64(&self, data: &str, logical_name: &str) -> DomainResult<String>;

    /// Store raw bytes. Returns the public URL.
    async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        logical_name: &str,
        content_type: &str,
    ) -> DomainResult<String>;

    /// Delete an object; `Ok(false)` when nothing was stored under the name
    async fn delete(&self, logical_name: &str) -> DomainResult<bool>;

    /// Public URL of a stored object
    fn get_url(&self, logical_name: &str) -> String;
}

/// Address geocoding. Failures of any kind are reported as `None`.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Option<Coordinates>;

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Option<String>;
}

/// Outbound email delivery
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> DomainResult<()>;
}

//! In-memory collaborators for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::entities::user::User;
use crate::domain::value_objects::geo::Coordinates;
use crate::errors::{DomainError, DomainResult};

use super::traits::{EmailSender, Geocoder, ImageStorage, PasswordHasher, PasswordVerification};

/// Reversible "hash" so tests can reason about stored values
#[derive(Debug, Clone, Default)]
pub struct MockPasswordHasher;

#[async_trait]
impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, _user: &User, password: &str) -> DomainResult<String> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, _user: &User, hash: &str, password: &str) -> PasswordVerification {
        if hash == format!("hashed:{password}") {
            PasswordVerification::Match
        } else {
            PasswordVerification::Mismatch
        }
    }
}

/// Records uploads by logical name
#[derive(Debug, Clone, Default)]
pub struct MockImageStorage {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    failing: Arc<AtomicBool>,
}

impl MockImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload fails while set
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn uploaded_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::external("storage", "upload rejected"));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageStorage for MockImageStorage {
    async fn upload_base64(&self, data: &str, logical_name: &str) -> DomainResult<String> {
        self.check_available()?;
        self.objects
            .write()
            .await
            .insert(logical_name.to_string(), data.as_bytes().to_vec());
        Ok(self.get_url(logical_name))
    }

    async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        logical_name: &str,
        _content_type: &str,
    ) -> DomainResult<String> {
        self.check_available()?;
        self.objects
            .write()
            .await
            .insert(logical_name.to_string(), bytes);
        Ok(self.get_url(logical_name))
    }

    async fn delete(&self, logical_name: &str) -> DomainResult<bool> {
        Ok(self.objects.write().await.remove(logical_name).is_some())
    }

    fn get_url(&self, logical_name: &str) -> String {
        format!("https://cdn.test/salehunter/{logical_name}.jpg")
    }
}

/// Geocoder answering from a fixed address table
#[derive(Debug, Clone, Default)]
pub struct MockGeocoder {
    known: Arc<RwLock<HashMap<String, Coordinates>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_address(self, address: &str, coordinates: Coordinates) -> Self {
        self.known
            .write()
            .await
            .insert(address.to_string(), coordinates);
        self
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        self.known.read().await.get(address).copied()
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Option<String> {
        self.known
            .read()
            .await
            .iter()
            .find(|(_, c)| **c == coordinates)
            .map(|(address, _)| address.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Captures outgoing email instead of sending it
#[derive(Debug, Clone, Default)]
pub struct MockEmailSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    failing: Arc<AtomicBool>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::external("smtp", "connection refused"));
        }
        self.sent.lock().await.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

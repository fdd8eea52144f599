//! Local-disk implementation of the ImageStorage trait.
//!
//! Objects are written to `{root}/{bucket}/{logical_name}.{ext}` and served
//! as `{public_url}/{bucket}/{logical_name}.{ext}`. Every filesystem call is
//! bounded by the configured timeout.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

use sh_core::errors::{DomainError, DomainResult, ValidationError};
use sh_core::services::external::ImageStorage;
use sh_shared::config::StorageConfig;

use crate::InfrastructureError;

/// Extensions the storage may write, in lookup order
const EXTENSIONS: [&str; 4] = ["jpg", "png", "gif", "webp"];

static DATA_URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:[^;,]*;base64,").expect("valid data URL pattern"));

/// Pick a file extension from the image's magic bytes; unknown content is jpg
pub fn detect_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        _ => "jpg",
    }
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Images on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
    public_url: String,
    bucket: String,
    timeout: Duration,
}

impl LocalImageStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            public_url: config.public_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.trim_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Logical names are relative paths without `..`
    fn validate_name(logical_name: &str) -> DomainResult<()> {
        let path = Path::new(logical_name);
        let safe = !logical_name.trim().is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if safe {
            Ok(())
        } else {
            Err(ValidationError::invalid_format("logical_name").into())
        }
    }

    fn object_path(&self, logical_name: &str, extension: &str) -> PathBuf {
        self.root
            .join(&self.bucket)
            .join(format!("{}.{}", logical_name, extension))
    }

    fn object_url(&self, logical_name: &str, extension: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            self.public_url, self.bucket, logical_name, extension
        )
    }

    /// Remove every stored extension of `logical_name` except `keep`
    async fn remove_variants(&self, logical_name: &str, keep: Option<&str>) -> DomainResult<bool> {
        let mut removed = false;
        for extension in EXTENSIONS.into_iter().filter(|ext| Some(*ext) != keep) {
            let path = self.object_path(logical_name, extension);
            let deleted = self
                .bounded(async {
                    match tokio::fs::remove_file(&path).await {
                        Ok(()) => Ok(true),
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                        Err(e) => Err(e),
                    }
                })
                .await?;
            removed |= deleted;
        }
        Ok(removed)
    }

    async fn bounded<T, F>(&self, operation: F) -> DomainResult<T>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result.map_err(|e| InfrastructureError::Io(e).into()),
            Err(_) => Err(DomainError::external("storage", "operation timed out")),
        }
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn upload_base64(&self, data: &str, logical_name: &str) -> DomainResult<String> {
        let payload = DATA_URL_PREFIX.replace(data.trim(), "");
        let bytes = STANDARD
            .decode(payload.as_bytes())
            .map_err(|_| DomainError::from(ValidationError::invalid_format("image")))?;

        let content_type = match detect_extension(&bytes) {
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "image/jpeg",
        };
        self.upload_bytes(bytes, logical_name, content_type).await
    }

    async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        logical_name: &str,
        content_type: &str,
    ) -> DomainResult<String> {
        Self::validate_name(logical_name)?;
        if bytes.is_empty() {
            return Err(ValidationError::required("image").into());
        }

        let extension =
            extension_for_content_type(content_type).unwrap_or_else(|| detect_extension(&bytes));
        let path = self.object_path(logical_name, extension);
        let size = bytes.len();
        self.remove_variants(logical_name, Some(extension)).await?;

        self.bounded(async {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, bytes).await
        })
        .await?;

        tracing::debug!(logical_name, extension, size, "Image stored");
        Ok(self.object_url(logical_name, extension))
    }

    /// Removes the object whatever extension it was stored with
    async fn delete(&self, logical_name: &str) -> DomainResult<bool> {
        Self::validate_name(logical_name)?;

        let removed = self.remove_variants(logical_name, None).await?;
        if removed {
            tracing::debug!(logical_name, "Image deleted");
        }
        Ok(removed)
    }

    fn get_url(&self, logical_name: &str) -> String {
        let extension = EXTENSIONS
            .into_iter()
            .find(|ext| self.object_path(logical_name, ext).exists())
            .unwrap_or("jpg");
        self.object_url(logical_name, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn storage(dir: &tempfile::TempDir) -> LocalImageStorage {
        LocalImageStorage::new(&StorageConfig {
            root: dir.path().to_string_lossy().into_owned(),
            public_url: "https://cdn.example.com/".to_string(),
            bucket: "salehunter".to_string(),
            timeout_secs: 5,
        })
    }

    #[test]
    fn test_detect_extension() {
        assert_eq!(detect_extension(&PNG_HEADER), "png");
        assert_eq!(detect_extension(b"GIF89a...."), "gif");
        assert_eq!(detect_extension(b"RIFF\0\0\0\0WEBPVP8 "), "webp");
        assert_eq!(detect_extension(&[0xFF, 0xD8, 0xFF]), "jpg");
        assert_eq!(detect_extension(b"plain text"), "jpg");
    }

    #[tokio::test]
    async fn test_upload_base64_strips_data_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let data = format!("data:image/png;base64,{}", STANDARD.encode(PNG_HEADER));

        let url = storage.upload_base64(&data, "stores/7/main").await.unwrap();

        assert_eq!(url, "https://cdn.example.com/salehunter/stores/7/main.png");
        let written = std::fs::read(dir.path().join("salehunter/stores/7/main.png")).unwrap();
        assert_eq!(written, PNG_HEADER);
        assert_eq!(storage.get_url("stores/7/main"), url);
    }

    #[tokio::test]
    async fn test_invalid_base64_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let err = storage
            .upload_base64("not base64!!", "users/1/profile")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let err = storage
            .upload_bytes(PNG_HEADER.to_vec(), "../outside", "image/png")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_reupload_with_new_extension_replaces_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage
            .upload_bytes(b"GIF89a-data".to_vec(), "users/4/profile", "image/gif")
            .await
            .unwrap();

        let url = storage
            .upload_bytes(PNG_HEADER.to_vec(), "users/4/profile", "image/png")
            .await
            .unwrap();

        assert!(url.ends_with("users/4/profile.png"));
        assert!(!dir.path().join("salehunter/users/4/profile.gif").exists());
        assert_eq!(storage.get_url("users/4/profile"), url);
    }

    #[tokio::test]
    async fn test_delete_finds_any_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage
            .upload_bytes(b"GIF89a-data".to_vec(), "products/3/a-0", "application/octet-stream")
            .await
            .unwrap();

        assert!(storage.delete("products/3/a-0").await.unwrap());
        assert!(!storage.delete("products/3/a-0").await.unwrap());
        assert!(!dir.path().join("salehunter/products/3/a-0.gif").exists());
    }
}

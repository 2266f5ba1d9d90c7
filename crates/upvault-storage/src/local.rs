//! Filesystem object store with HMAC-signed upload URLs.
//!
//! Upload URL: `{base_url}/store/{key}?expires={unix_ts}&signature={hex}` where
//! `signature = HMAC-SHA256(secret, "PUT\n{key}\n{expires}")`. The API serves
//! `PUT /store/{key}` and calls [`LocalStorage::verify_signed_put`] before
//! writing, so the local store behaves like a presigned bucket.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;

type HmacSha256 = Hmac<Sha256>;

/// RFC 3986 unreserved characters stay literal in the URL path.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    signing_secret: Vec<u8>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for objects (e.g., "./data/objects")
    /// * `base_url` - Public base URL of the API serving `/store` (e.g., "http://localhost:4000")
    /// * `signing_secret` - Secret used to sign and verify upload URLs
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signing_secret: impl Into<Vec<u8>>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();
        let signing_secret = signing_secret.into();

        if signing_secret.is_empty() {
            return Err(StorageError::ConfigError(
                "Local storage signing secret must not be empty".to_string(),
            ));
        }

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            signing_secret,
        })
    }

    /// Root directory objects are written under.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path, rejecting anything that could
    /// resolve outside the storage root.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if !validate_key(storage_key) {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);
        if !path.starts_with(&self.base_path) {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    fn mac(&self) -> StorageResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.signing_secret)
            .map_err(|e| StorageError::ConfigError(format!("Invalid signing secret: {}", e)))
    }

    fn sign(&self, storage_key: &str, expires: u64) -> StorageResult<String> {
        let mut mac = self.mac()?;
        mac.update(format!("PUT\n{}\n{}", storage_key, expires).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Build a signed upload URL valid until `expires` (unix seconds).
    pub fn signed_put_url(&self, storage_key: &str, expires: u64) -> StorageResult<String> {
        self.key_to_path(storage_key)?;
        let signature = self.sign(storage_key, expires)?;
        Ok(format!(
            "{}/store/{}?expires={}&signature={}",
            self.base_url.trim_end_matches('/'),
            utf8_percent_encode(storage_key, KEY_ENCODE_SET),
            expires,
            signature
        ))
    }

    /// Check a signed upload request. Fails with `Expired` once the deadline
    /// passes and `InvalidSignature` when the signature does not match the key.
    pub fn verify_signed_put(
        &self,
        storage_key: &str,
        expires: u64,
        signature: &str,
    ) -> StorageResult<()> {
        let tag = hex::decode(signature).map_err(|_| StorageError::InvalidSignature)?;
        let mut mac = self.mac()?;
        mac.update(format!("PUT\n{}\n{}", storage_key, expires).as_bytes());
        mac.verify_slice(&tag)
            .map_err(|_| StorageError::InvalidSignature)?;

        if unix_now() > expires {
            return Err(StorageError::Expired);
        }

        Ok(())
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[async_trait]
impl Storage for LocalStorage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let expires = unix_now().saturating_add(expires_in.as_secs());
        let url = self.signed_put_url(storage_key, expires)?;

        tracing::debug!(
            key = %storage_key,
            expires = expires,
            "Local storage upload URL signed"
        );

        Ok(url)
    }

    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %storage_key, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, key = %storage_key, "Local storage delete failed");
                Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

//! Issues time-boxed write credentials for direct-to-store uploads.
//!
//! The issuer never touches file bytes and never creates an object: it only
//! picks a fresh key and presigns a PUT URL for it.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use upvault_core::{AppError, UploadRequestDescriptor, WriteCredential};
use upvault_storage::{generate_object_key, Storage};
use validator::Validate;

#[derive(Clone)]
pub struct CredentialIssuer {
    storage: Arc<dyn Storage>,
    ttl: Duration,
}

impl CredentialIssuer {
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Validate the descriptor, allocate a unique key and presign a PUT URL for it.
    pub async fn issue(
        &self,
        descriptor: &UploadRequestDescriptor,
    ) -> Result<WriteCredential, AppError> {
        descriptor.validate()?;

        let object_key = generate_object_key(&descriptor.file_name);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.ttl)
                .map_err(|e| AppError::Internal(format!("Invalid credential TTL: {}", e)))?;

        let url = self
            .storage
            .presigned_put_url(&object_key, &descriptor.content_type, self.ttl)
            .await
            .map_err(|e| {
                AppError::CredentialIssue(format!(
                    "Failed to presign upload for {}: {}",
                    object_key, e
                ))
            })?;

        tracing::info!(
            key = %object_key,
            content_type = %descriptor.content_type,
            size_bytes = descriptor.size_bytes,
            backend = %self.storage.backend_type(),
            "Issued write credential"
        );

        Ok(WriteCredential {
            url,
            object_key,
            expires_at,
        })
    }
}

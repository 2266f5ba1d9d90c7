//! Domain methods for the upvault API client.

use crate::{api_prefix, ApiClient};
use anyhow::{Context, Result};
use upvault_core::{DeleteObjectRequest, DeleteObjectResponse, UploadRequestDescriptor, WriteCredential};

impl ApiClient {
    /// Ask the server for a presigned write credential for one file.
    pub async fn request_credential(
        &self,
        descriptor: &UploadRequestDescriptor,
    ) -> Result<WriteCredential> {
        let path = format!("{}/credential", api_prefix());
        self.post_json(&path, descriptor)
            .await
            .with_context(|| format!("Failed to obtain credential for {}", descriptor.file_name))
    }

    /// Delete a stored object by key. Succeeds when the object is already gone.
    pub async fn delete_object(&self, key: &str) -> Result<DeleteObjectResponse> {
        let path = format!("{}/object", api_prefix());
        let request = DeleteObjectRequest {
            key: key.to_string(),
        };
        self.delete_json(&path, &request)
            .await
            .with_context(|| format!("Failed to delete object {}", key))
    }
}

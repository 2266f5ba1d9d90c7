//! Seams between the orchestrator and the network.

use async_trait::async_trait;
use bytes::Bytes;
use upvault_api_client::{ApiClient, ProgressFn, TransferClient, TransferError};
use upvault_core::{UploadRequestDescriptor, WriteCredential};

#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn request_credential(
        &self,
        descriptor: &UploadRequestDescriptor,
    ) -> anyhow::Result<WriteCredential>;
}

#[async_trait]
pub trait ObjectTransfer: Send + Sync {
    async fn transfer(
        &self,
        payload: Bytes,
        content_type: &str,
        credential: &WriteCredential,
        on_progress: ProgressFn,
    ) -> Result<(), TransferError>;
}

#[async_trait]
pub trait ObjectRemover: Send + Sync {
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl CredentialSource for ApiClient {
    async fn request_credential(
        &self,
        descriptor: &UploadRequestDescriptor,
    ) -> anyhow::Result<WriteCredential> {
        ApiClient::request_credential(self, descriptor).await
    }
}

#[async_trait]
impl ObjectRemover for ApiClient {
    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        ApiClient::delete_object(self, key).await.map(|_| ())
    }
}

#[async_trait]
impl ObjectTransfer for TransferClient {
    async fn transfer(
        &self,
        payload: Bytes,
        content_type: &str,
        credential: &WriteCredential,
        on_progress: ProgressFn,
    ) -> Result<(), TransferError> {
        TransferClient::transfer(self, payload, content_type, credential, on_progress).await
    }
}

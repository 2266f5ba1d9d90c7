//! HTTP client for the upvault API.
//!
//! [`ApiClient`] talks to the credential server (issue credential, delete
//! object); [`TransferClient`] performs the direct PUT of file bytes to the
//! presigned URL with progress reporting. The uploader and CLI crates use both.

pub mod api;
pub mod transfer;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use transfer::{ProgressFn, TransferClient, TransferError};
pub use upvault_core::{DeleteObjectResponse, UploadRequestDescriptor, WriteCredential};

const DEFAULT_API_URL: &str = "http://localhost:4000";

/// API version prefix (e.g. "/api/v0"). Set UPVAULT_API_VERSION to match the server.
pub fn api_prefix() -> String {
    let version = std::env::var("UPVAULT_API_VERSION").unwrap_or_else(|_| "v0".to_string());
    format!("/api/{}", version)
}

/// HTTP client for the credential API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: UPVAULT_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("UPVAULT_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(base_url)
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        parse_json(response).await
    }

    /// DELETE with a JSON body and deserialize response.
    pub async fn delete_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .delete(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        parse_json(response).await
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(
            "API request failed with status {}: {}",
            status,
            error_message(&error_text)
        ));
    }

    response
        .json()
        .await
        .context("Failed to parse response as JSON")
}

/// Prefer the `error` field of the server's error body; fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

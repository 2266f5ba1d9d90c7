//! Direct-to-store transfer of file bytes to a presigned URL.
//!
//! The payload is sent as one PUT with an explicit `Content-Length`, streamed
//! in chunks so progress can be observed. Progress is `sent * 100 / total`,
//! capped at 99 until the store answers with a 2xx; only then is 100 reported.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, StreamExt};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use std::sync::Arc;
use upvault_core::WriteCredential;

/// Default size of each streamed body chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Progress callback, called with percentages in `1..=100`.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Upload credential expired at {0}")]
    Expired(DateTime<Utc>),

    #[error("Store rejected upload with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// Uploads file bytes to presigned URLs. No request timeout: large files on
/// slow links are bounded only by the credential's validity.
#[derive(Clone, Debug)]
pub struct TransferClient {
    client: Client,
    chunk_size: usize,
}

impl TransferClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create transfer client: {}", e))?;
        Ok(Self {
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// PUT `payload` to `credential.url`.
    ///
    /// Fails with `Expired` before any network I/O once the credential is past
    /// its expiry. Never retries.
    pub async fn transfer(
        &self,
        payload: Bytes,
        content_type: &str,
        credential: &WriteCredential,
        on_progress: ProgressFn,
    ) -> Result<(), TransferError> {
        if credential.is_expired_at(Utc::now()) {
            return Err(TransferError::Expired(credential.expires_at));
        }

        let total = payload.len();
        let start = std::time::Instant::now();
        let body = Body::wrap_stream(progress_stream(
            payload,
            self.chunk_size,
            on_progress.clone(),
        ));

        let response = self
            .client
            .put(&credential.url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, total)
            .body(body)
            .send()
            .await
            .map_err(|e| TransferError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                key = %credential.object_key,
                status = status.as_u16(),
                "Store rejected upload"
            );
            return Err(TransferError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        on_progress(100);

        tracing::debug!(
            key = %credential.object_key,
            size_bytes = total,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Transfer complete"
        );

        Ok(())
    }
}

/// Tracks bytes handed to the transport and reports each new percentage once.
struct ProgressTracker {
    total: usize,
    sent: usize,
    last_reported: u8,
    on_progress: ProgressFn,
}

impl ProgressTracker {
    fn new(total: usize, on_progress: ProgressFn) -> Self {
        Self {
            total,
            sent: 0,
            last_reported: 0,
            on_progress,
        }
    }

    fn advance(&mut self, bytes: usize) {
        self.sent = (self.sent + bytes).min(self.total);
        let percent = percent_sent(self.sent, self.total);
        if percent > self.last_reported {
            self.last_reported = percent;
            (self.on_progress)(percent);
        }
    }
}

/// `sent * 100 / total`, capped at 99.
fn percent_sent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (sent as u128 * 100 / total as u128).min(99);
    percent as u8
}

fn progress_stream(
    payload: Bytes,
    chunk_size: usize,
    on_progress: ProgressFn,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let total = payload.len();
    let chunks: Vec<Bytes> = (0..total)
        .step_by(chunk_size)
        .map(|offset| payload.slice(offset..(offset + chunk_size).min(total)))
        .collect();

    let mut tracker = ProgressTracker::new(total, on_progress);
    stream::iter(chunks).map(move |chunk| {
        tracker.advance(chunk.len());
        Ok(chunk)
    })
}

//! Upload endpoint of the local backend.
//!
//! Local presigned URLs point here; the request is accepted only when its
//! signature matches the key and has not expired.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::BytesRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use upvault_core::AppError;
use upvault_storage::Storage;

#[derive(Debug, Deserialize)]
pub struct SignedPutQuery {
    pub expires: Option<u64>,
    pub signature: Option<String>,
}

#[tracing::instrument(skip(state, query, headers, body), fields(key = %key))]
pub async fn put_object(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<SignedPutQuery>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let store = state
        .local_store
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Local store is not enabled".to_string()))?;

    let (expires, signature) = match (query.expires, query.signature) {
        (Some(expires), Some(signature)) => (expires, signature),
        _ => {
            return Err(AppError::Forbidden("Upload URL is missing its signature".to_string()).into())
        }
    };

    store.verify_signed_put(&key, expires, &signature)?;

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!(
                "Object exceeds {} bytes",
                state.config.storage.local_storage_max_object_bytes
            ))
        } else {
            AppError::InvalidInput(format!("Invalid upload body: {}", rejection.body_text()))
        }
    })?;
    tracing::debug!(size_bytes = body.len(), "Storing signed upload");

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    store.put_object(&key, body, content_type).await?;

    Ok(StatusCode::OK)
}

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use upvault_core::{UploadRequestDescriptor, WriteCredential};

/// Issue a presigned write credential for one file
#[utoipa::path(
    post,
    path = "/api/v0/credential",
    tag = "uploads",
    request_body = UploadRequestDescriptor,
    responses(
        (status = 200, description = "Write credential issued", body = WriteCredential),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Credential could not be issued", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        file_name = %request.file_name,
        content_type = %request.content_type,
        size_bytes = request.size_bytes,
        operation = "issue_credential"
    )
)]
pub async fn issue_credential(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadRequestDescriptor>,
) -> Result<impl IntoResponse, HttpAppError> {
    let credential = state.credential_issuer.issue(&request).await?;
    Ok(Json(credential))
}

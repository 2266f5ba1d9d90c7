use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use upvault_core::{DeleteObjectRequest, DeleteObjectResponse};

#[utoipa::path(
    delete,
    path = "/api/v0/object",
    tag = "objects",
    request_body = DeleteObjectRequest,
    responses(
        (status = 200, description = "Object deleted (or already absent)", body = DeleteObjectResponse),
        (status = 400, description = "Missing or invalid key", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(key = %request.key, operation = "delete_object"))]
pub async fn delete_object(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteObjectRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.object_deleter.delete(&request.key).await?;

    Ok(Json(DeleteObjectResponse {
        message: "Object deleted successfully".to_string(),
    }))
}

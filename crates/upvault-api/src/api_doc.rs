//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use upvault_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Upvault API",
        version = "0.1.0",
        description = "Issues presigned write credentials for direct-to-store uploads and deletes stored objects. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::credential::issue_credential,
        handlers::object_delete::delete_object,
    ),
    components(
        schemas(
            models::UploadRequestDescriptor,
            models::WriteCredential,
            models::DeleteObjectRequest,
            models::DeleteObjectResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Write credentials for direct uploads"),
        (name = "objects", description = "Stored object management")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

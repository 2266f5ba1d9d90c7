//! HTTP-level constants

pub use upvault_core::constants::API_PREFIX;

/// Path of the served OpenAPI document.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Route of the local backend's signed upload endpoint.
pub const LOCAL_STORE_ROUTE: &str = "/store/{key}";

/// Body limit for the JSON API routes. Object bodies are bounded separately
/// by the local store's configured maximum.
pub const API_BODY_LIMIT_BYTES: usize = 64 * 1024;

//! Shared constants

/// Default validity window of a presigned write credential.
pub const DEFAULT_PRESIGNED_URL_TTL_SECS: u64 = 360;

/// Upper bound accepted by S3 for presigned URLs (7 days).
pub const MAX_PRESIGNED_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default number of files accepted per batch by the uploader.
pub const DEFAULT_MAX_FILES_PER_BATCH: usize = 5;

/// Default per-file size limit of the uploader (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Default accepted content types of the uploader.
pub const DEFAULT_ACCEPTED_TYPES: &[&str] = &["image/*"];

/// API version prefix shared by the server routes and the client.
pub const API_PREFIX: &str = "/api/v0";

//! Upvault Core Library
//!
//! This crate provides the wire models, error types and configuration shared by
//! the upvault server, its HTTP client and the upload orchestrator.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{DeleteObjectRequest, DeleteObjectResponse, UploadRequestDescriptor, WriteCredential};
pub use storage_types::StorageBackend;

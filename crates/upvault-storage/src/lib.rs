//! Upvault Storage Library
//!
//! Storage abstraction for the credential server: presigning direct-upload
//! URLs and deleting objects. Backends are S3 (via `object_store`) and a local
//! filesystem store whose upload URLs are HMAC-signed and served by the API.
//!
//! # Object key format
//!
//! `{uuid}-{file name}`. Keys are opaque to every consumer; they must not contain
//! `..` or a leading `/`. Key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_object_key, MAX_KEY_BYTES};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use upvault_core::StorageBackend;

//! Upvault API Library
//!
//! HTTP surface of the credential server: credential issuing, object deletion,
//! the local backend's signed upload endpoint, and application setup.

mod api_doc;
pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{CredentialIssuer, ObjectDeleter};
pub use state::AppState;

//! Credential issuing and object deletion.
//!
//! Keeps handler logic thin and allows unit testing without HTTP.

pub mod credential_issuer;
pub mod object_deleter;

#[cfg(test)]
mod fake_storage;

pub use credential_issuer::CredentialIssuer;
pub use object_deleter::ObjectDeleter;

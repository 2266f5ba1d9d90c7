//! Application state shared by all handlers.

use crate::services::{CredentialIssuer, ObjectDeleter};
use std::sync::Arc;
use upvault_core::Config;
use upvault_storage::{LocalStorage, Storage};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    /// Present only for the local backend; serves signed uploads at `/store/{key}`.
    pub local_store: Option<Arc<LocalStorage>>,
    pub credential_issuer: CredentialIssuer,
    pub object_deleter: ObjectDeleter,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        local_store: Option<Arc<LocalStorage>>,
    ) -> Self {
        let credential_issuer = CredentialIssuer::new(storage.clone(), config.presigned_url_ttl());
        let object_deleter = ObjectDeleter::new(storage.clone());
        Self {
            config,
            storage,
            local_store,
            credential_issuer,
            object_deleter,
        }
    }
}

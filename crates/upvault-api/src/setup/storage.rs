//! Storage setup and initialization

use anyhow::Result;
use std::sync::Arc;
use upvault_core::{Config, StorageBackend};
use upvault_storage::factory::create_local_storage;
use upvault_storage::{create_storage, LocalStorage, Storage};

/// Build the configured backend. For the local backend the concrete store is
/// returned as well so the API can serve its signed upload endpoint.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn Storage>, Option<Arc<LocalStorage>>)> {
    tracing::info!("Initializing storage abstraction...");

    let (storage, local_store): (Arc<dyn Storage>, Option<Arc<LocalStorage>>) =
        match config.storage_backend() {
            StorageBackend::Local => {
                let local = Arc::new(create_local_storage(config).await?);
                tracing::info!(
                    path = %local.base_path().display(),
                    "Local store enabled at /store"
                );
                let storage: Arc<dyn Storage> = local.clone();
                (storage, Some(local))
            }
            StorageBackend::S3 => (create_storage(config).await?, None),
        };

    tracing::info!(
        backend = %storage.backend_type(),
        "Storage abstraction initialized successfully"
    );

    Ok((storage, local_store))
}

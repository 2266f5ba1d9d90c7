use std::sync::Arc;
use upvault_core::AppError;
use upvault_storage::{Storage, StorageError};

/// Deletes stored objects by key. Deleting a missing object succeeds.
#[derive(Clone)]
pub struct ObjectDeleter {
    storage: Arc<dyn Storage>,
}

impl ObjectDeleter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The key is used exactly as given: generated keys may end in whitespace
    /// carried over from the file name.
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        if key.trim().is_empty() {
            return Err(AppError::InvalidInput("key is required".to_string()));
        }

        match self.storage.delete(key).await {
            Ok(()) => {
                tracing::info!(key = %key, "Object deleted");
                Ok(())
            }
            Err(StorageError::NotFound(_)) => {
                tracing::debug!(key = %key, "Object already absent, treating delete as done");
                Ok(())
            }
            Err(StorageError::InvalidKey(msg)) => Err(AppError::InvalidInput(msg)),
            Err(e) => Err(AppError::Delete(format!("Failed to delete {}: {}", key, e))),
        }
    }
}

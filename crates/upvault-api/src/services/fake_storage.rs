use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use upvault_storage::{Storage, StorageBackend, StorageError, StorageResult};

/// In-memory store that records calls and can be told to fail.
#[derive(Default)]
pub struct FakeStorage {
    pub presign_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub fail_presign: bool,
    pub fail_delete: bool,
    pub objects: Mutex<Vec<String>>,
}

impl FakeStorage {
    pub fn with_object(key: &str) -> Self {
        let storage = Self::default();
        storage.objects.lock().unwrap().push(key.to_string());
        storage
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_presign {
            return Err(StorageError::SigningFailed("credentials unavailable".to_string()));
        }
        Ok(format!(
            "https://bucket.test/{}?X-Amz-Expires={}",
            storage_key,
            expires_in.as_secs()
        ))
    }

    async fn put_object(&self, storage_key: &str, _data: Bytes, _ct: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().push(storage_key.to_string());
        Ok(())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(StorageError::DeleteFailed("connection reset".to_string()));
        }
        let mut objects = self.objects.lock().unwrap();
        match objects.iter().position(|k| k == storage_key) {
            Some(index) => {
                objects.remove(index);
                Ok(())
            }
            None => Err(StorageError::NotFound(storage_key.to_string())),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().iter().any(|k| k == storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

//! Revocable local handles to file payloads.
//!
//! A [`PreviewHandle`] registers the payload under a `blob:` style URL that a
//! renderer can resolve. Dropping the handle revokes the URL.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

const PREVIEW_URL_PREFIX: &str = "blob:upvault/";

type Registry = Arc<Mutex<HashMap<Uuid, Bytes>>>;

fn lock(registry: &Registry) -> MutexGuard<'_, HashMap<Uuid, Bytes>> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Table of live preview URLs.
#[derive(Clone, Default, Debug)]
pub struct PreviewRegistry {
    inner: Registry,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, data: Bytes) -> PreviewHandle {
        let id = Uuid::new_v4();
        lock(&self.inner).insert(id, data);
        PreviewHandle {
            id,
            registry: self.inner.clone(),
        }
    }

    /// Payload behind a preview URL, if it is still live.
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        let id = url
            .strip_prefix(PREVIEW_URL_PREFIX)
            .and_then(|id| Uuid::parse_str(id).ok())?;
        lock(&self.inner).get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        lock(&self.inner).len()
    }
}

#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: Registry,
}

impl PreviewHandle {
    pub fn url(&self) -> String {
        format!("{}{}", PREVIEW_URL_PREFIX, self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_revokes_url() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(Bytes::from_static(b"png"));
        let url = handle.url();

        assert_eq!(registry.resolve(&url), Some(Bytes::from_static(b"png")));
        assert_eq!(registry.live_count(), 1);

        drop(handle);
        assert_eq!(registry.resolve(&url), None);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn foreign_urls_do_not_resolve() {
        let registry = PreviewRegistry::new();
        let _handle = registry.acquire(Bytes::from_static(b"png"));
        assert_eq!(registry.resolve("https://example.com/cat.png"), None);
        assert_eq!(registry.resolve("blob:upvault/not-a-uuid"), None);
    }
}

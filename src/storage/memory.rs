//! In-memory object store.
//!
//! Used when no store root is configured (every lookup misses) and as a
//! deterministic store in tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectStore, StoreError, StoredObject};

/// Objects held in a map, fixed once the store is shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: HashMap<String, StoredObject>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, deriving its entity tag from the content.
    pub fn insert(&mut self, key: impl Into<String>, content_type: &str, body: impl Into<Bytes>) {
        let body = body.into();
        let mut hasher = DefaultHasher::new();
        body.hash(&mut hasher);

        self.objects.insert(
            key.into(),
            StoredObject {
                etag: format!("\"{:x}-{:x}\"", hasher.finish(), body.len()),
                body,
                content_type: content_type.to_string(),
                last_modified: None,
                cache_control: None,
            },
        );
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        Ok(self.objects.get(key).cloned())
    }
}

//! Static object storage.
//!
//! # Data Flow
//! ```text
//! Last path segment (key)
//!     → ObjectStore::get
//!     → Some(StoredObject) → served directly with its metadata
//!     → None               → marketing platform fallback
//! ```
//!
//! # Design Decisions
//! - A miss is a normal result, not an error
//! - Keys are single path segments; anything that could escape the store
//!   (`.`, `..`, separators) is treated as a miss

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

/// Errors raised by an object store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object store root '{0}' is not a directory")]
    NotADirectory(String),
}

/// An object together with the HTTP metadata it is served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    /// Quoted entity tag.
    pub etag: String,
    /// HTTP-date of the last modification, when known.
    pub last_modified: Option<String>,
    pub cache_control: Option<String>,
}

/// Key → object lookup.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError>;
}

/// Whether `key` can name an object.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("logo.svg"));
        assert!(is_valid_key("robots.txt"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key(".."));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key("a\\b"));
    }
}

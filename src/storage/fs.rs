//! Filesystem-backed object store.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;

use super::{is_valid_key, ObjectStore, StoreError, StoredObject};

/// Serves objects from files directly under a root directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    cache_control: Option<String>,
}

impl FsObjectStore {
    /// Open a store rooted at `root`, which must be an existing directory.
    pub fn open(root: impl AsRef<Path>, cache_control: Option<String>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        if !std::fs::metadata(root)?.is_dir() {
            return Err(StoreError::NotADirectory(root.display().to_string()));
        }

        tracing::info!(root = %root.display(), "Object store opened");
        Ok(Self {
            root: root.to_path_buf(),
            cache_control,
        })
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        if !is_valid_key(key) {
            return Ok(None);
        }

        let path = self.root.join(key);
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let body = tokio::fs::read(&path).await?;

        let modified = meta.modified().ok();
        let etag = format!(
            "\"{:x}-{:x}\"",
            modified
                .and_then(|m| m.duration_since(SystemTime::UNIX_EPOCH).ok())
                .map_or(0, |d| d.as_secs()),
            meta.len()
        );

        Ok(Some(StoredObject {
            body: Bytes::from(body),
            content_type: mime_guess::from_path(key)
                .first_or_octet_stream()
                .to_string(),
            etag,
            last_modified: modified.map(httpdate::fmt_http_date),
            cache_control: self.cache_control.clone(),
        }))
    }
}

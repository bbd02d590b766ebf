//! Local filesystem blob store for uploaded payloads.
//!
//! Every payload is written under a unique storage name so that display
//! names never collide on disk. Removal is best-effort idempotent: deleting
//! a payload that is already gone is not an error.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use archivio_core::error::{AppError, ErrorKind};
use archivio_core::result::AppResult;

/// Stream of payload bytes as read from disk.
pub type BlobStream = ReaderStream<fs::File>;

/// Blob store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored payloads.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a blob store rooted at the given path, creating it if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Generate a unique storage name preserving the original extension.
    pub fn storage_name(original_name: &str) -> String {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        format!("{}-{}{}", Utc::now().timestamp_millis(), Uuid::new_v4(), ext)
    }

    /// Resolve a storage name to an absolute path within the root.
    fn resolve(&self, storage_name: &str) -> PathBuf {
        self.root.join(storage_name.trim_start_matches('/'))
    }

    /// Write a payload under the given storage name, returning its locator.
    pub async fn write(&self, storage_name: &str, data: &Bytes) -> AppResult<String> {
        let full_path = self.resolve(storage_name);
        fs::write(&full_path, data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write payload: {storage_name}"),
                e,
            )
        })?;
        debug!(storage_name, bytes = data.len(), "Wrote payload");
        Ok(full_path.to_string_lossy().into_owned())
    }

    /// Open a payload as a byte stream for downloading.
    pub async fn read_stream(&self, storage_name: &str) -> AppResult<BlobStream> {
        let full_path = self.resolve(storage_name);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Payload not found: {storage_name}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open payload: {storage_name}"),
                    e,
                )
            }
        })?;
        Ok(ReaderStream::new(file))
    }

    /// Remove a payload. Missing payloads are treated as already removed.
    pub async fn remove(&self, storage_name: &str) -> AppResult<()> {
        let full_path = self.resolve(storage_name);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(storage_name, "Removed payload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to remove payload: {storage_name}"),
                e,
            )),
        }
    }

    /// Check whether a payload exists on disk.
    pub async fn exists(&self, storage_name: &str) -> bool {
        fs::try_exists(self.resolve(storage_name)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(tag: &str) -> LocalBlobStore {
        let dir = std::env::temp_dir().join(format!("archivio-blob-test-{tag}-{}", Uuid::new_v4()));
        LocalBlobStore::new(dir.to_str().unwrap()).await.unwrap()
    }

    #[test]
    fn test_storage_name_keeps_extension_lowercased() {
        let name = LocalBlobStore::storage_name("Quarterly Report.PDF");
        assert!(name.ends_with(".pdf"));
        assert_ne!(
            LocalBlobStore::storage_name("a.pdf"),
            LocalBlobStore::storage_name("a.pdf")
        );
    }

    #[tokio::test]
    async fn test_write_read_remove_roundtrip() {
        let store = temp_store("roundtrip").await;
        let name = LocalBlobStore::storage_name("note.pdf");

        store.write(&name, &Bytes::from_static(b"payload")).await.unwrap();
        assert!(store.exists(&name).await);

        store.remove(&name).await.unwrap();
        assert!(!store.exists(&name).await);
        // Removing again is fine.
        store.remove(&name).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_missing_payload_is_not_found() {
        let store = temp_store("missing").await;
        let err = store.read_stream("nope.pdf").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}

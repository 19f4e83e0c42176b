/// Disk-based event storage backend
use crate::{blob_store::EventBackend, error::StorageError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Disk storage backend
///
/// Stores one file per event, named by the event key, in a flat directory.
/// Meant for local development against a copy of the bucket.
#[derive(Clone)]
pub struct DiskEventBackend {
    base_path: PathBuf,
}

impl DiskEventBackend {
    /// Create a new disk storage backend
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the file path for a key
    ///
    /// Keys that could escape the base directory have no path.
    fn event_path(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
            || key.contains('\0')
        {
            return None;
        }
        Some(self.base_path.join(key))
    }
}

#[async_trait]
impl EventBackend for DiskEventBackend {
    fn name(&self) -> &'static str {
        "disk"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let Some(path) = self.event_path(key) else {
            debug!("Rejected unsafe event key: {:?}", key);
            return Ok(None);
        };

        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError(format!("Failed to read event {}: {}", key, e))),
        }
    }

    async fn check(&self) -> Result<(), StorageError> {
        match fs::metadata(&self.base_path).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(StorageError(format!(
                "{} is not a directory",
                self.base_path.display()
            ))),
            Err(e) => Err(StorageError(format!(
                "Event directory {} not accessible: {}",
                self.base_path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_get_stored_event() {
        let dir = tempdir().unwrap();
        let backend = DiskEventBackend::new(dir.path().to_path_buf());

        let data = br#"{"previous":"x","type":"t","data":"d"}"#.to_vec();
        std::fs::write(dir.path().join("1220abc"), &data).unwrap();

        let retrieved = backend.get("1220abc").await.unwrap();
        assert_eq!(retrieved, Some(data));
    }

    #[tokio::test]
    async fn test_get_nonexistent_event() {
        let dir = tempdir().unwrap();
        let backend = DiskEventBackend::new(dir.path().to_path_buf());

        let result = backend.get("nonexistent").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_unsafe_keys_are_not_found() {
        let dir = tempdir().unwrap();
        let inner = dir.path().join("events");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret"), b"{}").unwrap();

        let backend = DiskEventBackend::new(inner);

        assert_eq!(backend.get("../secret").await.unwrap(), None);
        assert_eq!(backend.get("..").await.unwrap(), None);
        assert_eq!(backend.get("a/b").await.unwrap(), None);
        assert_eq!(backend.get("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("adir")).unwrap();
        let backend = DiskEventBackend::new(dir.path().to_path_buf());

        // Reading a directory as a file is an I/O error, not a miss
        assert!(backend.get("adir").await.is_err());
    }

    #[tokio::test]
    async fn test_check() {
        let dir = tempdir().unwrap();
        let backend = DiskEventBackend::new(dir.path().to_path_buf());
        assert!(backend.check().await.is_ok());

        let missing = DiskEventBackend::new(dir.path().join("missing"));
        assert!(missing.check().await.is_err());
    }
}

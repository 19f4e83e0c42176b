/// Event Blob Storage
///
/// Read access to the key-addressed store holding serialized events.
/// Supports multiple backend implementations (S3, disk)

pub mod disk;
#[cfg(test)]
pub mod memory;
pub mod s3;

pub use disk::DiskEventBackend;
pub use s3::{S3Config, S3EventBackend};

use crate::error::StorageError;
use async_trait::async_trait;

/// Event storage backend trait
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait EventBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Retrieve the raw bytes stored under `key`, `None` if there is no such object
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Verify the backend is reachable
    async fn check(&self) -> Result<(), StorageError>;
}

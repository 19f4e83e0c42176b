/// In-memory event storage backend for tests
use crate::{blob_store::EventBackend, error::StorageError, events::Event};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

#[derive(Clone)]
enum Entry {
    Bytes(Vec<u8>),
    Delayed(Vec<u8>, Duration),
    Failure(String),
}

/// Map-backed store that counts reads
#[derive(Default)]
pub struct MemoryEventBackend {
    objects: RwLock<HashMap<String, Entry>>,
    reads: AtomicUsize,
}

impl MemoryEventBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_raw(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), Entry::Bytes(bytes.into()));
    }

    pub fn insert_event(&self, key: &str, event: &Event) {
        self.insert_raw(key, serde_json::to_vec(event).unwrap());
    }

    /// Make reads of `key` fail with a backend error
    pub fn insert_failure(&self, key: &str, message: &str) {
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), Entry::Failure(message.to_string()));
    }

    /// Serve `bytes` for `key` only after `delay` has elapsed
    pub fn insert_delayed(&self, key: &str, bytes: impl Into<Vec<u8>>, delay: Duration) {
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), Entry::Delayed(bytes.into(), delay));
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventBackend for MemoryEventBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let entry = self.objects.read().unwrap().get(key).cloned();
        match entry {
            Some(Entry::Bytes(bytes)) => Ok(Some(bytes)),
            Some(Entry::Delayed(bytes, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(Some(bytes))
            }
            Some(Entry::Failure(message)) => Err(StorageError(message)),
            None => Ok(None),
        }
    }

    async fn check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

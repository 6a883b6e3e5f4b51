//! In-memory [`ObjectStore`] used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::{ObjectStore, StorageError};

/// A blob store held in a process-local map.
///
/// `fail_puts` lets tests simulate an unavailable store and assert that
/// no record is committed when an upload fails.
#[derive(Default)]
pub struct MemoryObjectStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_puts: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with a [`StorageError::Upload`].
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Fetch the stored bytes for `key`, if present.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .expect("blob map lock poisoned")
            .get(key)
            .cloned()
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.lock().expect("blob map lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Upload {
                key: key.to_string(),
                source: "simulated store outage".into(),
            });
        }
        self.blobs
            .lock()
            .expect("blob map lock poisoned")
            .insert(key.to_string(), bytes);
        Ok(())
    }

    fn url(&self, key: &str) -> String {
        format!("memory://{key}")
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.blobs
            .lock()
            .expect("blob map lock poisoned")
            .remove(key);
        Ok(())
    }
}

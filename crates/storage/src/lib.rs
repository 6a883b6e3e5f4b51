//! Object storage abstraction for uploaded design images.
//!
//! The lifecycle layer only needs three operations against a
//! key-addressed blob store: put, url, delete. [`ObjectStore`] captures
//! that contract; [`s3::S3ObjectStore`] is the production implementation
//! and [`memory::MemoryObjectStore`] backs tests.

pub mod memory;
pub mod s3;

use std::sync::Arc;

/// Error from an object-store operation. Operations are never retried;
/// the failure propagates and aborts the request.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload of '{key}' failed: {source}")]
    Upload {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Delete of '{key}' failed: {source}")]
    Delete {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Narrow contract with the external blob store.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, overwriting any existing blob.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Public URL for the blob stored under `key`. Does not check existence.
    fn url(&self, key: &str) -> String;

    /// Remove the blob stored under `key`. Deleting a missing key is not
    /// an error (S3 semantics).
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle used throughout the API layer.
pub type DynObjectStore = Arc<dyn ObjectStore>;

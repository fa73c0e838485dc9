//! Storage adapters for the domain ports.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::domain::ports::ReviewStoreHandle;
use crate::error::Result;
use in_memory::InMemoryReviewStore;
use std::path::Path;
use std::sync::Arc;

/// Picks the review store backend for the given optional database path.
///
/// Without the `storage-rocksdb` feature a requested path is ignored with a
/// warning on stderr and reviews are kept in memory.
pub fn open_review_store(db_path: Option<&Path>) -> Result<ReviewStoreHandle> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            tracing::info!(path = %path.display(), "Opening RocksDB review store");
            Ok(Arc::new(rocksdb::RocksDBReviewStore::open(path)?))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Arc::new(InMemoryReviewStore::new()))
        }
        None => Ok(Arc::new(InMemoryReviewStore::new())),
    }
}

//! Persistent key-value cache for the Hearth client.
//!
//! The cache survives process restarts and holds the session bundle (token,
//! user) and house data as opaque JSON blobs. Cached values are advisory:
//! the session and membership layers always revalidate them against the
//! server before trusting them.

mod cache;
mod file;
mod keys;
mod traits;

pub use cache::CacheManager;
pub use file::FileStorage;
pub use keys::CacheKeys;
pub use traits::KeyValueStore;

use hearth_core::Paths;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage under the client base directory.
pub fn create_storage(paths: &Paths) -> StorageResult<Box<dyn KeyValueStore>> {
    let storage = FileStorage::open(paths.cache_file())?;
    Ok(Box::new(storage))
}

/// Create a CacheManager backed by the default file storage.
pub fn create_cache_manager(paths: &Paths) -> StorageResult<CacheManager> {
    let storage = create_storage(paths)?;
    Ok(CacheManager::new(storage))
}

//! Storage trait definitions

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Opaque key-value blob store for full-state snapshots.
///
/// Semantics are last-write-wins; no transactional guarantees are assumed
/// beyond that. Implementations must be thread-safe (`Send + Sync`).
pub trait SnapshotStore: Send + Sync {
    /// Load the blob stored under `key`, if any.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `blob` under `key`, replacing any previous value.
    fn save(&self, key: &str, blob: &str) -> StorageResult<()>;

    /// Remove the blob under `key`. Returns whether something was removed.
    fn delete(&self, key: &str) -> StorageResult<bool>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: SnapshotStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}

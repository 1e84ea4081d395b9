//! In-memory snapshot store for tests and ephemeral sessions

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::traits::{SnapshotStore, StorageError, StorageResult};

/// In-memory snapshot store.
///
/// Counts writes so tests can assert on persistence behavior, and can be
/// configured to reject writes to exercise the best-effort persistence
/// path.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .blobs
            .lock()
            .expect("blob lock poisoned")
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, blob: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::WriteRejected(
                "memory store configured to fail writes".to_string(),
            ));
        }
        self.blobs
            .lock()
            .expect("blob lock poisoned")
            .insert(key.to_string(), blob.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self
            .blobs
            .lock()
            .expect("blob lock poisoned")
            .remove(key)
            .is_some())
    }
}

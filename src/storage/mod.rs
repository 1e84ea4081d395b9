//! Snapshot storage backends
//!
//! The engine persists its full state as an opaque blob through the
//! `SnapshotStore` trait. `SqliteStore` is the durable backend;
//! `MemoryStore` serves tests and ephemeral sessions.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{OpenStore, SnapshotStore, StorageError, StorageResult};

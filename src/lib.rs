//! Mindmesh: Incremental Mindmap Engine
//!
//! A client-resident hierarchical graph ("mindmap") that is incrementally
//! updated by an external text-analysis collaborator and by direct user
//! edits. The engine owns the reconciliation problem: merging partial,
//! possibly-overlapping node updates from an asynchronous collaborator into
//! a locally mutable tree without corrupting identity, parent/child
//! consistency, or layout state.
//!
//! # Core Concepts
//!
//! - **Nodes**: mindmap entities with a stable id, display text, and a
//!   parent pointer that is the single source of truth for tree shape
//! - **Wire Map**: flat id-keyed serialization with explicit children lists,
//!   used on the collaborator boundary
//! - **Layout Tree**: nested representation consumed by rendering/layout
//! - **Reconciliation**: one cycle of sending current state to the
//!   collaborator and merging its response back
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mindmesh::{Config, GraphStore, MemoryStore};
//!
//! let snapshots = Arc::new(MemoryStore::new());
//! let store = GraphStore::new(snapshots, Config::default());
//! store.init();
//! // Store is ready for use
//! ```

mod graph;
pub mod collaborator;
pub mod config;
pub mod reconcile;
pub mod storage;

pub use collaborator::{
    Collaborator, CollaboratorError, CollaboratorResult, InspirationItem, InspirationResponse,
    MindmapUpdateRequest, MindmapUpdateResponse, MockCollaborator, SummarizeResponse,
    ThoughtAnalysis,
};
pub use config::{Config, SpawnRegion};
pub use graph::transform;
pub use graph::{
    BrainstormState, Connection, GraphError, GraphResult, GraphStore, InspirationSuggestion,
    Keyword, LayoutNode, MindNode, Thought, WireNode,
};
pub use reconcile::{Reconciler, UpdateOutcome};
pub use storage::{MemoryStore, OpenStore, SnapshotStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! GraphStore: the single mutable source of truth for one session
//!
//! Every mutation is an atomic read-modify-write on a cloned snapshot that
//! is swapped in whole, then persisted to the blob store. Persistence is
//! write-through and best-effort: a failed write is logged, never surfaced.
//! Other components read via [`GraphStore::snapshot`] only.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::storage::SnapshotStore;

use super::node::{MindNode, WireNode};
use super::state::{migrate_legacy, BrainstormState};
use super::thought::{InspirationSuggestion, Thought};

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node already exists: {0}")]
    DuplicateNode(String),
}

/// Result type for store operations
pub type GraphResult<T> = Result<T, GraphError>;

/// The single mutable source of truth for one brainstorm session.
///
/// Owns the state behind a lock so it can be shared via `Arc` across the
/// reconciler's suspension points; mutation entry points here are the only
/// legal mutators.
pub struct GraphStore {
    state: RwLock<BrainstormState>,
    snapshots: Arc<dyn SnapshotStore>,
    config: Config,
}

impl GraphStore {
    /// Create a store with an empty state, backed by the given blob store.
    pub fn new(snapshots: Arc<dyn SnapshotStore>, config: Config) -> Self {
        Self {
            state: RwLock::new(BrainstormState::default()),
            snapshots,
            config,
        }
    }

    /// Load the stored snapshot, if any, applying the legacy migration.
    ///
    /// Any load or parse failure logs and leaves the store in its default
    /// empty state, never fatal.
    pub fn init(&self) {
        let blob = match self.snapshots.load(&self.config.snapshot_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = %self.config.snapshot_key, "no stored snapshot");
                return;
            }
            Err(err) => {
                warn!(%err, "snapshot load failed; starting empty");
                return;
            }
        };
        let mut value: serde_json::Value = match serde_json::from_str(&blob) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "stored snapshot is not valid JSON; starting empty");
                return;
            }
        };
        migrate_legacy(&mut value);
        match serde_json::from_value::<BrainstormState>(value) {
            Ok(loaded) => {
                let nodes = loaded.nodes.len();
                *self.write_lock() = loaded;
                info!(nodes, "snapshot restored");
            }
            Err(err) => {
                warn!(%err, "stored snapshot did not deserialize; starting empty");
            }
        }
    }

    /// Cloned read view of the current state.
    pub fn snapshot(&self) -> BrainstormState {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Look up a node by id.
    pub fn get_node(&self, id: &str) -> Option<MindNode> {
        self.state
            .read()
            .expect("state lock poisoned")
            .node(id)
            .cloned()
    }

    pub fn node_count(&self) -> usize {
        self.state.read().expect("state lock poisoned").nodes.len()
    }

    /// Force persistence of the current state. Idempotent.
    pub fn save(&self) {
        let guard = self.state.read().expect("state lock poisoned");
        self.persist(&guard);
    }

    // --- Collaborator merge ---

    /// Merge a batch of collaborator-proposed nodes.
    ///
    /// Nodes with a known id get a text-only update; position, flags, and
    /// parent are never touched from this path. Unknown ids become new
    /// nodes with default flags, a random position in the spawn region, and
    /// no parent yet. A second pass then rebuilds parent pointers from the
    /// incoming `children` lists; when the same child id appears under two
    /// incoming parents, the later entry in batch order wins (accepted
    /// upstream ambiguity).
    ///
    /// Returns whether anything changed; a no-op batch skips the
    /// persistence write entirely.
    pub fn upsert_from_collaborator(&self, updated: &[WireNode]) -> bool {
        self.mutate_tracked(|state, store| {
            let mut changed = false;
            for incoming in updated {
                match state.node_mut(&incoming.id) {
                    Some(existing) => {
                        if existing.text != incoming.text {
                            existing.text = incoming.text.clone();
                            changed = true;
                        }
                    }
                    None => {
                        let (x, y) = store.config.spawn_region.sample();
                        state.nodes.push(
                            MindNode::new(incoming.id.clone(), incoming.text.clone())
                                .with_level(1)
                                .at_position(x, y),
                        );
                        changed = true;
                    }
                }
            }
            for incoming in updated {
                for child_id in &incoming.children {
                    let Some(child) = state.node_mut(child_id) else {
                        continue;
                    };
                    if child.parent.as_deref() != Some(incoming.id.as_str()) {
                        child.parent = Some(incoming.id.clone());
                        changed = true;
                    }
                }
            }
            changed
        })
    }

    // --- User edits ---

    /// Delete a node and all its transitive descendants.
    ///
    /// The closure is computed with a visited-set-guarded expansion over
    /// parent pointers, so malformed cycles terminate. Connections touching
    /// any removed id go with them. Deleting an unknown id is a safe no-op
    /// beyond the persistence write.
    pub fn delete_node(&self, id: &str) {
        self.mutate(|state, _| {
            let mut doomed: HashSet<String> = HashSet::new();
            let mut frontier = vec![id.to_string()];
            while let Some(current) = frontier.pop() {
                if !doomed.insert(current.clone()) {
                    continue;
                }
                for node in &state.nodes {
                    if node.parent.as_deref() == Some(current.as_str())
                        && !doomed.contains(&node.id)
                    {
                        frontier.push(node.id.clone());
                    }
                }
            }
            let before = state.nodes.len();
            state.nodes.retain(|n| !doomed.contains(&n.id));
            state
                .connections
                .retain(|c| !doomed.contains(&c.source) && !doomed.contains(&c.target));
            debug!(id, removed = before - state.nodes.len(), "node deleted");
        });
    }

    /// Add a node created directly by the user.
    ///
    /// Locally created nodes get a UUID id. `parent`, when given, must name
    /// an existing node. Returns the new node's id.
    pub fn add_node(&self, text: &str, parent: Option<&str>) -> GraphResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert_node(id.clone(), text, parent)?;
        Ok(id)
    }

    /// Accept a pending inspiration suggestion into the mindmap.
    ///
    /// Attaches a node with the suggestion's `node_id` under its
    /// `parent_node_id` and removes the suggestion from the pending list.
    pub fn accept_inspiration(&self, suggestion: &InspirationSuggestion) -> GraphResult<()> {
        self.mutate_try(|state, store| {
            if state.node(&suggestion.node_id).is_some() {
                return Err(GraphError::DuplicateNode(suggestion.node_id.clone()));
            }
            let parent = state
                .node(&suggestion.parent_node_id)
                .ok_or_else(|| GraphError::NodeNotFound(suggestion.parent_node_id.clone()))?;
            let level = parent.level + 1;
            let (x, y) = store.config.spawn_region.sample();
            state.nodes.push(
                MindNode::new(suggestion.node_id.clone(), suggestion.title.clone())
                    .with_parent(suggestion.parent_node_id.clone())
                    .with_level(level)
                    .at_position(x, y),
            );
            state
                .inspiration
                .retain(|s| s.node_id != suggestion.node_id);
            Ok(())
        })
    }

    /// Move a node on the canvas.
    pub fn update_node_position(&self, id: &str, x: f64, y: f64) {
        self.mutate(|state, _| {
            if let Some(node) = state.node_mut(id) {
                node.x = x;
                node.y = y;
            }
        });
    }

    /// Toggle the user-owned core marker.
    pub fn toggle_core(&self, id: &str) {
        self.mutate(|state, _| {
            if let Some(node) = state.node_mut(id) {
                node.is_core = !node.is_core;
            }
        });
    }

    /// Toggle the render-only collapse flag.
    pub fn toggle_collapsed(&self, id: &str) {
        self.mutate(|state, _| {
            if let Some(node) = state.node_mut(id) {
                node.is_collapsed = !node.is_collapsed;
            }
        });
    }

    /// Toggle visibility of the inspiration panel.
    pub fn toggle_inspiration(&self) {
        self.mutate(|state, _| state.show_inspiration = !state.show_inspiration);
    }

    /// Toggle automatic inspiration refresh after each update cycle.
    pub fn toggle_auto_inspiration(&self) {
        self.mutate(|state, _| state.auto_inspiration = !state.auto_inspiration);
    }

    // --- Cycle bookkeeping ---

    /// Replace the free-text session summary.
    pub fn set_summary(&self, summary: &str) {
        self.mutate(|state, _| state.summary = summary.to_string());
    }

    /// Append one utterance to the outbound message history.
    pub fn push_history(&self, input: &str) {
        self.mutate(|state, _| state.voice_text_history.push(input.to_string()));
    }

    /// Append one derived thought record.
    pub fn push_thought(&self, thought: Thought) {
        self.mutate(|state, _| state.thoughts.push(thought));
    }

    /// Replace the pending inspiration suggestions.
    pub fn set_inspiration(&self, suggestions: Vec<InspirationSuggestion>) {
        self.mutate(|state, _| state.inspiration = suggestions);
    }

    // --- Mutation plumbing ---

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, BrainstormState> {
        self.state.write().expect("state lock poisoned")
    }

    /// Apply a mutation to a cloned snapshot, swap it in, and persist.
    fn mutate(&self, f: impl FnOnce(&mut BrainstormState, &Self)) {
        let mut guard = self.write_lock();
        let mut next = guard.clone();
        f(&mut next, self);
        *guard = next;
        self.persist(&guard);
    }

    /// Like [`Self::mutate`], but the mutation reports whether anything
    /// changed; an unchanged snapshot is neither swapped nor persisted.
    fn mutate_tracked(&self, f: impl FnOnce(&mut BrainstormState, &Self) -> bool) -> bool {
        let mut guard = self.write_lock();
        let mut next = guard.clone();
        let changed = f(&mut next, self);
        if changed {
            *guard = next;
            self.persist(&guard);
        }
        changed
    }

    /// Like [`Self::mutate`], but all-or-nothing: an `Err` leaves the state
    /// untouched and unpersisted.
    fn mutate_try<T>(
        &self,
        f: impl FnOnce(&mut BrainstormState, &Self) -> GraphResult<T>,
    ) -> GraphResult<T> {
        let mut guard = self.write_lock();
        let mut next = guard.clone();
        let value = f(&mut next, self)?;
        *guard = next;
        self.persist(&guard);
        Ok(value)
    }

    fn insert_node(&self, id: String, text: &str, parent: Option<&str>) -> GraphResult<()> {
        self.mutate_try(|state, store| {
            if state.node(&id).is_some() {
                return Err(GraphError::DuplicateNode(id.clone()));
            }
            let (parent_id, level) = match parent {
                Some(pid) => {
                    let parent_node = state
                        .node(pid)
                        .ok_or_else(|| GraphError::NodeNotFound(pid.to_string()))?;
                    (Some(pid.to_string()), parent_node.level + 1)
                }
                None => (None, 0),
            };
            let (x, y) = store.config.spawn_region.sample();
            let mut node = MindNode::new(id.clone(), text).with_level(level).at_position(x, y);
            node.parent = parent_id;
            state.nodes.push(node);
            Ok(())
        })
    }

    fn persist(&self, state: &BrainstormState) {
        let blob = match serde_json::to_string(state) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(%err, "state serialization failed; snapshot skipped");
                return;
            }
        };
        if let Err(err) = self.snapshots.save(&self.config.snapshot_key, &blob) {
            warn!(key = %self.config.snapshot_key, %err, "snapshot write failed; continuing");
        }
    }
}

//! Node and connection types for the mindmap graph

use serde::{Deserialize, Serialize};

/// A single mindmap node.
///
/// `parent` is the single source of truth for tree shape; child lists are
/// derived, never stored. `level` is advisory display depth; it may be
/// stale after a merge and is only guaranteed consistent with `parent`
/// after [`crate::transform::flatten_layout_tree`].
///
/// Field names serialize in the camelCase form used by stored snapshots, so
/// blobs written by earlier clients load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindNode {
    /// Stable unique identifier (snake_case from the collaborator, UUID for
    /// locally created nodes).
    pub id: String,
    /// Display label.
    pub text: String,
    /// Id of the parent node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Advisory depth from the root.
    #[serde(default)]
    pub level: i32,
    /// User-toggled core marker; never set by the collaborator.
    #[serde(default)]
    pub is_core: bool,
    /// Render-only collapse flag.
    #[serde(default)]
    pub is_collapsed: bool,
    /// Layout position, owned by the layout engine after creation.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    // Remaining fields belong to the external layout engine and are carried
    // through serialization untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtree_height: Option<f64>,
}

impl MindNode {
    /// Create a node with the given id and text and default flags.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the parent id.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the advisory level.
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Set the layout position.
    pub fn at_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Id to use on the wire. Falls back to `text` for legacy nodes that
    /// never got an id. Best-effort only, not authoritative.
    pub fn wire_id(&self) -> &str {
        if self.id.is_empty() {
            &self.text
        } else {
            &self.id
        }
    }
}

/// Legacy explicit edge between two nodes.
///
/// A derived cache only: tree shape comes from `parent` pointers, and
/// snapshots without a connection list are normal. When present, no
/// connection may reference an id outside the node set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    1.0
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            strength: 1.0,
        }
    }
}

/// Wire-shape node used on the collaborator boundary.
///
/// `children` is an explicit ordered id list and is the sole source from
/// which parent pointers are rebuilt on merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub children: Vec<String>,
}

impl WireNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }
}

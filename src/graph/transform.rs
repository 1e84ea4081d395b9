//! Pure conversions between the canonical node list and the two wire shapes
//!
//! Two consumers, two shapes: the collaborator boundary takes a flat
//! id-keyed map with explicit children lists ([`wire_map`]); the layout
//! engine takes a nested tree ([`layout_tree`]). Neither pair of transforms
//! is an inverse of the other, but each transform is idempotent on its own
//! output shape.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::node::{MindNode, WireNode};

/// Uid of the synthetic root produced for an empty node list.
pub const SYNTHETIC_ROOT_UID: &str = "root";

/// Display text of the synthetic root.
pub const SYNTHETIC_ROOT_TEXT: &str = "Central topic";

/// Nested tree shape consumed by the rendering/layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub uid: String,
    pub text: String,
    /// Inverse of the node's collapse flag.
    pub expand: bool,
    /// Mirrors the node's core marker.
    pub is_active: bool,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

/// Build the flat id-keyed map sent to the collaborator.
///
/// Keys are node ids; nodes that never got an id key under their text
/// instead (best-effort for pre-migration data, not authoritative).
/// Children lists are rebuilt from parent pointers in list order; a parent
/// id absent from the map is skipped rather than crashing the build.
pub fn wire_map(nodes: &[MindNode]) -> HashMap<String, WireNode> {
    let mut map: HashMap<String, WireNode> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        let id = node.wire_id().to_string();
        map.insert(id.clone(), WireNode::new(id, node.text.clone()));
    }
    for node in nodes {
        let Some(parent) = node.parent.as_deref() else {
            continue;
        };
        let id = node.wire_id().to_string();
        if let Some(entry) = map.get_mut(parent) {
            entry.children.push(id);
        }
    }
    map
}

/// Build the nested tree the layout engine consumes.
///
/// Root selection: first node with `level == 0` or no parent, else the
/// first node in list order. The fallback is deliberately lossy: nodes
/// unreachable from the chosen root do not appear in the tree. An empty
/// input yields a fixed synthetic root with no children.
///
/// Terminates on cyclic parent pointers: a node already on the current
/// path cuts the branch instead of recursing.
pub fn layout_tree(nodes: &[MindNode]) -> LayoutNode {
    let root = nodes
        .iter()
        .find(|n| n.level == 0 || n.parent.is_none())
        .or_else(|| nodes.first());
    let Some(root) = root else {
        return LayoutNode {
            uid: SYNTHETIC_ROOT_UID.to_string(),
            text: SYNTHETIC_ROOT_TEXT.to_string(),
            expand: true,
            is_active: false,
            children: Vec::new(),
        };
    };
    let mut on_path = HashSet::new();
    build_subtree(root, nodes, &mut on_path)
}

fn build_subtree(
    current: &MindNode,
    nodes: &[MindNode],
    on_path: &mut HashSet<String>,
) -> LayoutNode {
    let uid = current.wire_id().to_string();
    on_path.insert(uid.clone());

    let mut children = Vec::new();
    for child in nodes.iter().filter(|n| n.parent.as_deref() == Some(uid.as_str())) {
        if on_path.contains(child.wire_id()) {
            continue;
        }
        children.push(build_subtree(child, nodes, on_path));
    }

    on_path.remove(&uid);
    LayoutNode {
        uid,
        text: current.text.clone(),
        expand: !current.is_collapsed,
        is_active: current.is_core,
        children,
    }
}

/// Flatten a layout tree back into a node list.
///
/// Assigns `level` from traversal depth and `parent` from the traversal
/// edge; this is the only place `level` is guaranteed consistent with `parent`.
/// Positions are zeroed; the layout engine reassigns them.
pub fn flatten_layout_tree(root: &LayoutNode) -> Vec<MindNode> {
    let mut out = Vec::new();
    flatten_into(root, None, 0, &mut out);
    out
}

fn flatten_into(node: &LayoutNode, parent: Option<&str>, level: i32, out: &mut Vec<MindNode>) {
    let id = if node.uid.is_empty() {
        node.text.clone()
    } else {
        node.uid.clone()
    };
    out.push(MindNode {
        id: id.clone(),
        text: node.text.clone(),
        parent: parent.map(str::to_owned),
        level,
        is_core: node.is_active,
        is_collapsed: !node.expand,
        ..Default::default()
    });
    for child in &node.children {
        flatten_into(child, Some(&id), level + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> Vec<MindNode> {
        vec![
            MindNode::new("root", "Theme").with_level(0),
            MindNode::new("a", "Branch A").with_parent("root").with_level(1),
            MindNode::new("b", "Branch B").with_parent("root").with_level(1),
            MindNode::new("a1", "Leaf").with_parent("a").with_level(2),
        ]
    }

    #[test]
    fn wire_map_rebuilds_children_from_parents() {
        let map = wire_map(&sample_nodes());
        assert_eq!(map.len(), 4);
        assert_eq!(map["root"].children, vec!["a", "b"]);
        assert_eq!(map["a"].children, vec!["a1"]);
        assert!(map["b"].children.is_empty());
    }

    #[test]
    fn wire_map_skips_dangling_parent() {
        let nodes = vec![
            MindNode::new("a", "A"),
            MindNode::new("b", "B").with_parent("missing"),
        ];
        let map = wire_map(&nodes);
        assert_eq!(map.len(), 2);
        assert!(map.values().all(|n| n.children.is_empty()));
    }

    #[test]
    fn wire_map_keys_legacy_nodes_under_text() {
        let nodes = vec![
            MindNode::new("", "Legacy"),
            MindNode::new("child", "Child").with_parent("Legacy"),
        ];
        let map = wire_map(&nodes);
        assert_eq!(map["Legacy"].children, vec!["child"]);
    }

    #[test]
    fn wire_map_round_trip_preserves_relationships() {
        let nodes = sample_nodes();
        let map = wire_map(&nodes);

        // Rebuild parent pointers from children lists alone.
        let mut rebuilt: HashMap<&str, &str> = HashMap::new();
        for entry in map.values() {
            for child in &entry.children {
                rebuilt.insert(child.as_str(), entry.id.as_str());
            }
        }
        for node in &nodes {
            assert_eq!(
                node.parent.as_deref(),
                rebuilt.get(node.id.as_str()).copied()
            );
        }
    }

    #[test]
    fn layout_tree_of_empty_list_is_synthetic_root() {
        let tree = layout_tree(&[]);
        assert_eq!(tree.uid, SYNTHETIC_ROOT_UID);
        assert!(tree.children.is_empty());
        assert!(tree.expand);
    }

    #[test]
    fn layout_tree_nests_children_under_root() {
        let tree = layout_tree(&sample_nodes());
        assert_eq!(tree.uid, "root");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].uid, "a");
        assert_eq!(tree.children[0].children[0].uid, "a1");
    }

    #[test]
    fn layout_tree_reflects_flags() {
        let mut nodes = sample_nodes();
        nodes[1].is_collapsed = true;
        nodes[1].is_core = true;
        let tree = layout_tree(&nodes);
        let a = &tree.children[0];
        assert!(!a.expand);
        assert!(a.is_active);
    }

    #[test]
    fn layout_tree_terminates_on_parent_cycle() {
        let nodes = vec![
            MindNode::new("a", "A").with_parent("b").with_level(1),
            MindNode::new("b", "B").with_parent("a").with_level(1),
        ];
        // No qualifying root; falls back to the first node. The cycle must
        // cut instead of recursing forever.
        let tree = layout_tree(&nodes);
        assert_eq!(tree.uid, "a");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].uid, "b");
        assert!(tree.children[0].children.is_empty());
    }

    #[test]
    fn layout_fallback_root_drops_unreachable_nodes() {
        let nodes = vec![
            MindNode::new("x", "X").with_parent("ghost").with_level(3),
            MindNode::new("y", "Y").with_parent("ghost").with_level(3),
        ];
        // No node qualifies as root, so the first in list order wins and
        // everything unreachable from it is dropped.
        let tree = layout_tree(&nodes);
        assert_eq!(tree.uid, "x");
        assert!(tree.children.is_empty());
    }

    #[test]
    fn flatten_assigns_levels_and_parents_from_traversal() {
        let mut nodes = sample_nodes();
        // Deliberately stale levels: flatten must recompute from depth.
        nodes[3].level = 99;
        let flat = flatten_layout_tree(&layout_tree(&nodes));

        assert_eq!(flat.len(), 4);
        let leaf = flat.iter().find(|n| n.id == "a1").unwrap();
        assert_eq!(leaf.level, 2);
        assert_eq!(leaf.parent.as_deref(), Some("a"));
        let root = flat.iter().find(|n| n.id == "root").unwrap();
        assert_eq!(root.level, 0);
        assert_eq!(root.parent, None);
    }

    #[test]
    fn flatten_is_idempotent_through_the_tree_shape() {
        let flat = flatten_layout_tree(&layout_tree(&sample_nodes()));
        let again = flatten_layout_tree(&layout_tree(&flat));
        assert_eq!(flat, again);
    }
}

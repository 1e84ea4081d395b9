//! Full session state snapshot and its legacy migration

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::{Connection, MindNode};
use super::thought::{InspirationSuggestion, Thought};

/// Complete state of one brainstorm session.
///
/// This is the value the store mutates and the blob store persists. Every
/// field defaults, so a partial stored blob merges over the empty state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrainstormState {
    pub thoughts: Vec<Thought>,
    pub nodes: Vec<MindNode>,
    pub connections: Vec<Connection>,
    pub summary: String,
    pub inspiration: Vec<InspirationSuggestion>,
    pub voice_text_history: Vec<String>,
    pub show_inspiration: bool,
    pub auto_inspiration: bool,
}

impl BrainstormState {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&MindNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut MindNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}

/// Rewrite a stored blob from the pre-`nodes` schema in place.
///
/// Older snapshots kept nodes under `allKeywords`, with `name` doubling as
/// id and display text. The migrated list replaces `nodes`; a stray legacy
/// `keywords` field is dropped. Best-effort: entries carrying neither the
/// modern fields nor a `name` are left as-is and fail deserialization
/// downstream, which `init()` treats as a fresh start.
pub(crate) fn migrate_legacy(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    if let Some(mut legacy) = obj.remove("allKeywords") {
        if let Some(entries) = legacy.as_array_mut() {
            for entry in entries.iter_mut() {
                let Some(fields) = entry.as_object_mut() else {
                    continue;
                };
                let name = fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                let Some(name) = name else { continue };
                let id_missing = fields
                    .get("id")
                    .and_then(Value::as_str)
                    .map_or(true, str::is_empty);
                let text_missing = fields
                    .get("text")
                    .and_then(Value::as_str)
                    .map_or(true, str::is_empty);
                if id_missing {
                    fields.insert("id".to_string(), Value::String(name.clone()));
                }
                if text_missing {
                    fields.insert("text".to_string(), Value::String(name));
                }
            }
        }
        obj.insert("nodes".to_string(), legacy);
    }
    obj.remove("keywords");
}

//! Thought records and inspiration suggestions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Keyword attached to a thought.
///
/// Heterogeneous by history: older blobs stored bare strings, newer ones
/// store records carrying `text` or `name`. Normalize via [`Keyword::display`]
/// before showing to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keyword {
    Plain(String),
    Record {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl Keyword {
    /// Normalized display text. Empty when a record carries neither field.
    pub fn display(&self) -> &str {
        match self {
            Keyword::Plain(s) => s,
            Keyword::Record { text: Some(t), .. } => t,
            Keyword::Record {
                text: None,
                name: Some(n),
            } => n,
            Keyword::Record {
                text: None,
                name: None,
            } => "",
        }
    }
}

impl From<String> for Keyword {
    fn from(s: String) -> Self {
        Keyword::Plain(s)
    }
}

impl From<&str> for Keyword {
    fn from(s: &str) -> Self {
        Keyword::Plain(s.to_string())
    }
}

/// Immutable record of one raw user utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    /// The utterance exactly as entered.
    pub original: String,
    /// Collaborator-derived summary.
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    /// Absent in blobs written before timestamps were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Thought {
    /// Create a thought record, timestamped now.
    pub fn new(
        original: impl Into<String>,
        summary: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            original: original.into(),
            summary: summary.into(),
            keywords: keywords.into_iter().map(Keyword::Plain).collect(),
            created_at: Some(Utc::now()),
        }
    }
}

/// A collaborator-proposed idea the user may accept into the mindmap.
///
/// `node_id` is the id the node will take if accepted; `parent_node_id`
/// names an existing node to attach under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspirationSuggestion {
    pub title: String,
    pub description: String,
    pub reason: String,
    pub node_id: String,
    pub parent_node_id: String,
}

//! Core graph data structures and the session store

mod node;
mod state;
mod store;
mod thought;
pub mod transform;

pub use node::{Connection, MindNode, WireNode};
pub use state::BrainstormState;
pub use store::{GraphError, GraphResult, GraphStore};
pub use thought::{InspirationSuggestion, Keyword, Thought};
pub use transform::LayoutNode;

//! Reconciliation: one update cycle against the collaborator
//!
//! A cycle snapshots the store, sends the wire map plus utterance history
//! out, waits for the collaborator, and merges the answer back. At most one
//! cycle is in flight at a time; overlapping requests are dropped, never
//! queued. A failed cycle leaves the store exactly as it was.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::collaborator::{Collaborator, CollaboratorError, MindmapUpdateRequest};
use crate::graph::{transform, GraphStore, Thought};

/// What became of one [`Reconciler::request_update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The cycle ran and the collaborator's changes were merged.
    Applied,
    /// Input was empty or whitespace-only; nothing happened.
    EmptyInput,
    /// Another cycle was already in flight; this request was dropped.
    Dropped,
}

/// Orchestrates update cycles against the collaborator.
pub struct Reconciler {
    collaborator: Arc<dyn Collaborator>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Reconciler {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            collaborator,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a cycle is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one update cycle for `input`.
    ///
    /// `already_recorded` asserts the caller has put `input` into the
    /// history themselves; the cycle then neither appends it nor records a
    /// thought for it.
    ///
    /// The two collaborator calls of a cycle (mindmap update and utterance
    /// analysis) run concurrently with no ordering between them; both must
    /// succeed before any store mutation. Any failure logs, abandons the
    /// cycle with the store untouched, and surfaces the error.
    pub async fn request_update(
        &self,
        store: &GraphStore,
        input: &str,
        already_recorded: bool,
    ) -> Result<UpdateOutcome, CollaboratorError> {
        if input.trim().is_empty() {
            debug!("ignoring empty input");
            return Ok(UpdateOutcome::EmptyInput);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("reconciliation already in flight; dropping request");
            return Ok(UpdateOutcome::Dropped);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let state = store.snapshot();
        let mut messages = state.voice_text_history.clone();
        if !already_recorded {
            messages.push(input.to_string());
        }
        let mindmap = transform::wire_map(&state.nodes);
        debug!(
            messages = messages.len(),
            nodes = mindmap.len(),
            "sending update cycle"
        );

        let update_call = self.collaborator.update_mindmap(MindmapUpdateRequest {
            messages,
            mindmap: Some(mindmap),
        });
        let analysis_call = self.collaborator.analyze_thought(input);
        let (update, analysis) = tokio::join!(update_call, analysis_call);

        let update = match update {
            Ok(update) => update,
            Err(err) => {
                error!(%err, "mindmap update failed; cycle abandoned");
                return Err(err);
            }
        };
        let analysis = match analysis {
            Ok(analysis) => analysis,
            Err(err) => {
                error!(%err, "thought analysis failed; cycle abandoned");
                return Err(err);
            }
        };

        store.upsert_from_collaborator(&update.updated_nodes);
        store.set_summary(&update.summary);
        if !already_recorded {
            store.push_history(input);
            store.push_thought(Thought::new(input, analysis.summary, analysis.keywords));
        }
        info!(nodes = update.updated_nodes.len(), "reconciliation applied");

        if store.snapshot().auto_inspiration {
            if let Err(err) = self.refresh_inspiration(store).await {
                warn!(%err, "inspiration refresh failed; suggestions unchanged");
            }
        }

        Ok(UpdateOutcome::Applied)
    }

    /// Replace the pending suggestion list from the collaborator.
    ///
    /// Returns the number of suggestions received. A failure leaves the
    /// current list in place.
    pub async fn refresh_inspiration(
        &self,
        store: &GraphStore,
    ) -> Result<usize, CollaboratorError> {
        let state = store.snapshot();
        let mindmap = transform::wire_map(&state.nodes);
        let suggestions = self
            .collaborator
            .recommend_inspirations(&state.voice_text_history, &mindmap)
            .await?;
        let count = suggestions.len();
        store.set_inspiration(suggestions);
        debug!(count, "inspiration suggestions refreshed");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{MindmapUpdateResponse, MockCollaborator, ThoughtAnalysis};
    use crate::config::Config;
    use crate::graph::WireNode;
    use crate::storage::MemoryStore;

    fn store() -> GraphStore {
        GraphStore::new(Arc::new(MemoryStore::new()), Config::default())
    }

    fn applied_mock() -> MockCollaborator {
        MockCollaborator::new()
            .with_update(MindmapUpdateResponse {
                summary: "new summary".to_string(),
                updated_nodes: vec![WireNode::new("idea", "Idea")],
            })
            .with_analysis(ThoughtAnalysis {
                summary: "thought summary".to_string(),
                keywords: vec!["idea".to_string()],
            })
    }

    #[tokio::test]
    async fn empty_input_is_a_no_op() {
        let store = store();
        let reconciler = Reconciler::new(Arc::new(applied_mock()));

        let outcome = reconciler.request_update(&store, "   ", false).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::EmptyInput);
        assert_eq!(store.node_count(), 0);
        assert!(store.snapshot().voice_text_history.is_empty());
    }

    #[tokio::test]
    async fn applied_cycle_merges_and_records() {
        let store = store();
        let mock = Arc::new(applied_mock());
        let reconciler = Reconciler::new(mock.clone());

        let outcome = reconciler
            .request_update(&store, "my input", false)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied);

        let state = store.snapshot();
        assert_eq!(state.summary, "new summary");
        assert_eq!(state.voice_text_history, vec!["my input".to_string()]);
        assert_eq!(state.thoughts.len(), 1);
        assert_eq!(state.thoughts[0].original, "my input");
        assert!(store.get_node("idea").is_some());

        // Outbound request carried the new input as the last message.
        let request = mock.last_update_request().unwrap();
        assert_eq!(request.messages.last().map(String::as_str), Some("my input"));
    }

    #[tokio::test]
    async fn already_recorded_input_skips_history_and_thought() {
        let store = store();
        store.push_history("my input");
        let mock = Arc::new(applied_mock());
        let reconciler = Reconciler::new(mock.clone());

        reconciler
            .request_update(&store, "my input", true)
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.voice_text_history, vec!["my input".to_string()]);
        assert!(state.thoughts.is_empty());
        assert_eq!(
            mock.last_update_request().unwrap().messages,
            vec!["my input".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_cycle_leaves_store_untouched() {
        let store = store();
        store.push_history("earlier");
        let before = store.snapshot();

        let mock = MockCollaborator::new()
            .with_update_failure(CollaboratorError::Unreachable("down".to_string()))
            .with_analysis(ThoughtAnalysis {
                summary: "s".to_string(),
                keywords: vec![],
            });
        let reconciler = Reconciler::new(Arc::new(mock));

        let err = reconciler
            .request_update(&store, "my input", false)
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Unreachable(_)));
        assert_eq!(store.snapshot(), before);
        assert!(!reconciler.is_in_flight());
    }

    #[tokio::test]
    async fn analysis_failure_also_abandons_the_cycle() {
        let store = store();
        let mock = MockCollaborator::new()
            .with_update(MindmapUpdateResponse {
                summary: "would apply".to_string(),
                updated_nodes: vec![WireNode::new("idea", "Idea")],
            })
            .with_analysis_failure(CollaboratorError::ParseError("bad".to_string()));
        let reconciler = Reconciler::new(Arc::new(mock));

        let err = reconciler
            .request_update(&store, "my input", false)
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::ParseError(_)));
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.snapshot().summary, "");
    }

    #[tokio::test]
    async fn in_flight_guard_clears_after_failure() {
        let store = store();
        let reconciler = Reconciler::new(Arc::new(MockCollaborator::new()));

        assert!(reconciler
            .request_update(&store, "input", false)
            .await
            .is_err());
        assert!(!reconciler.is_in_flight());

        // The flag cleared, so a later request is not dropped.
        let outcome = reconciler.request_update(&store, "input", false).await;
        assert!(outcome.is_err(), "mock still unconfigured");
    }

    #[tokio::test]
    async fn refresh_inspiration_replaces_pending_list() {
        let store = store();
        let suggestion = crate::graph::InspirationSuggestion {
            title: "t".to_string(),
            description: "d".to_string(),
            reason: "r".to_string(),
            node_id: "n".to_string(),
            parent_node_id: "p".to_string(),
        };
        let mock = MockCollaborator::new().with_suggestions(vec![suggestion.clone()]);
        let reconciler = Reconciler::new(Arc::new(mock));

        let count = reconciler.refresh_inspiration(&store).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.snapshot().inspiration, vec![suggestion]);
    }
}

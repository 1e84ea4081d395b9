//! Collaborator boundary — the external analysis service
//!
//! Defines the client trait and request/response types for the remote
//! text-analysis collaborator. Transport lives behind the trait; the crate
//! ships `MockCollaborator` for testing. Every call fails as a unit;
//! there is no partial-success shape.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::graph::{InspirationSuggestion, WireNode};

/// Response to a summarize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub tags: Vec<String>,
}

/// One external inspiration search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspirationItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Response to an inspiration query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspirationResponse {
    pub items: Vec<InspirationItem>,
}

/// Outbound payload of one mindmap update cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapUpdateRequest {
    /// Full utterance history, current input last.
    pub messages: Vec<String>,
    /// Current graph as a flat id-keyed map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mindmap: Option<HashMap<String, WireNode>>,
}

/// Collaborator's answer to an update cycle: changed/new nodes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapUpdateResponse {
    pub summary: String,
    pub updated_nodes: Vec<WireNode>,
}

/// Per-utterance analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThoughtAnalysis {
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Errors from collaborator calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CollaboratorError {
    #[error("collaborator unreachable: {0}")]
    Unreachable(String),

    #[error("collaborator call failed: {0}")]
    CallFailed(String),

    #[error("response parse error: {0}")]
    ParseError(String),
}

/// Result type for collaborator calls
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Client trait for the analysis collaborator.
///
/// Abstracts over transport so the reconciler doesn't depend on how the
/// service is reached.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Summarize a titled document.
    async fn summarize(&self, title: &str, content: &str) -> CollaboratorResult<SummarizeResponse>;

    /// Search for external inspiration material.
    async fn inspiration(&self, query: &str) -> CollaboratorResult<InspirationResponse>;

    /// Propose mindmap changes for the given history and current graph.
    async fn update_mindmap(
        &self,
        request: MindmapUpdateRequest,
    ) -> CollaboratorResult<MindmapUpdateResponse>;

    /// Analyze a single utterance into a summary and keywords.
    async fn analyze_thought(&self, text: &str) -> CollaboratorResult<ThoughtAnalysis>;

    /// Recommend suggestions to graft onto the current graph.
    async fn recommend_inspirations(
        &self,
        messages: &[String],
        mindmap: &HashMap<String, WireNode>,
    ) -> CollaboratorResult<Vec<InspirationSuggestion>>;
}

/// Mock collaborator for testing — returns preconfigured responses.
///
/// Unconfigured calls fail with [`CollaboratorError::CallFailed`]. An
/// optional delay makes in-flight overlap observable in tests.
#[derive(Default)]
pub struct MockCollaborator {
    delay: Option<Duration>,
    summarize: Option<CollaboratorResult<SummarizeResponse>>,
    inspiration: Option<CollaboratorResult<InspirationResponse>>,
    update: Option<CollaboratorResult<MindmapUpdateResponse>>,
    analysis: Option<CollaboratorResult<ThoughtAnalysis>>,
    suggestions: Option<CollaboratorResult<Vec<InspirationSuggestion>>>,
    update_calls: AtomicUsize,
    analyze_calls: AtomicUsize,
    recommend_calls: AtomicUsize,
    last_update_request: Mutex<Option<MindmapUpdateRequest>>,
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, keeping the request observably in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_summarize(mut self, response: SummarizeResponse) -> Self {
        self.summarize = Some(Ok(response));
        self
    }

    pub fn with_inspiration(mut self, response: InspirationResponse) -> Self {
        self.inspiration = Some(Ok(response));
        self
    }

    pub fn with_update(mut self, response: MindmapUpdateResponse) -> Self {
        self.update = Some(Ok(response));
        self
    }

    pub fn with_update_failure(mut self, error: CollaboratorError) -> Self {
        self.update = Some(Err(error));
        self
    }

    pub fn with_analysis(mut self, response: ThoughtAnalysis) -> Self {
        self.analysis = Some(Ok(response));
        self
    }

    pub fn with_analysis_failure(mut self, error: CollaboratorError) -> Self {
        self.analysis = Some(Err(error));
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<InspirationSuggestion>) -> Self {
        self.suggestions = Some(Ok(suggestions));
        self
    }

    /// How many update cycles reached the mock.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn recommend_calls(&self) -> usize {
        self.recommend_calls.load(Ordering::SeqCst)
    }

    /// The most recent update request, for asserting outbound payloads.
    pub fn last_update_request(&self) -> Option<MindmapUpdateRequest> {
        self.last_update_request
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn respond<T: Clone>(slot: &Option<CollaboratorResult<T>>, call: &str) -> CollaboratorResult<T> {
        match slot {
            Some(result) => result.clone(),
            None => Err(CollaboratorError::CallFailed(format!(
                "no mock response configured for {call}"
            ))),
        }
    }
}

#[async_trait]
impl Collaborator for MockCollaborator {
    async fn summarize(
        &self,
        _title: &str,
        _content: &str,
    ) -> CollaboratorResult<SummarizeResponse> {
        self.pause().await;
        Self::respond(&self.summarize, "summarize")
    }

    async fn inspiration(&self, _query: &str) -> CollaboratorResult<InspirationResponse> {
        self.pause().await;
        Self::respond(&self.inspiration, "inspiration")
    }

    async fn update_mindmap(
        &self,
        request: MindmapUpdateRequest,
    ) -> CollaboratorResult<MindmapUpdateResponse> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_update_request
            .lock()
            .expect("mock lock poisoned") = Some(request);
        self.pause().await;
        Self::respond(&self.update, "update_mindmap")
    }

    async fn analyze_thought(&self, _text: &str) -> CollaboratorResult<ThoughtAnalysis> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Self::respond(&self.analysis, "analyze_thought")
    }

    async fn recommend_inspirations(
        &self,
        _messages: &[String],
        _mindmap: &HashMap<String, WireNode>,
    ) -> CollaboratorResult<Vec<InspirationSuggestion>> {
        self.recommend_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Self::respond(&self.suggestions, "recommend_inspirations")
    }
}

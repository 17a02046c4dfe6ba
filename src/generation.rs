//! Final-story generation: the external capability seam and the
//! orchestrator that feeds it.
//!
//! An output node is terminal. Instead of forwarding, it gathers what
//! upstream sends delivered into its received slot and hands that, plus
//! its own settings, to a [`StoryGenerator`]. The orchestrator drives the
//! Idle → CheckInput → Generating → Completed/Rejected cycle: input is
//! validated and snapshotted synchronously, the external call is the only
//! suspension point, and a second trigger while one is in flight is
//! rejected rather than queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::{EventEmitter, GraphEvent};
use crate::graph::GraphStore;
use crate::node::Payload;
use crate::types::NodeType;

// ============================================================================
// Capability Seam
// ============================================================================

/// Failure reported by a concrete generation provider. Surfaced verbatim
/// inline at the output node.
#[derive(Debug, Error, Diagnostic)]
#[error("provider error ({provider}): {message}")]
#[diagnostic(code(storygraph::generation::provider))]
pub struct ProviderError {
    pub provider: &'static str,
    pub message: String,
}

/// Settings an output node carries into generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub length: String,
    pub creativity: u8,
    pub tone: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            length: "medium".into(),
            creativity: 5,
            tone: "serious".into(),
        }
    }
}

impl GenerationSettings {
    /// Reads settings out of an output node's field map, falling back to
    /// the defaults for anything missing or mistyped — field patches are
    /// shallow and untyped, so the reader stays lenient.
    #[must_use]
    pub fn from_payload(data: &Payload) -> Self {
        let defaults = Self::default();
        Self {
            length: data
                .get("length")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
                .unwrap_or(defaults.length),
            creativity: data
                .get("creativity")
                .and_then(|v| v.as_u64())
                .and_then(|v| u8::try_from(v).ok())
                .unwrap_or(defaults.creativity),
            tone: data
                .get("tone")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
                .unwrap_or(defaults.tone),
        }
    }
}

/// The external generation capability:
/// `generate(elements, settings) -> text`.
///
/// The call may suspend indefinitely; the orchestrator treats the node as
/// busy until it resolves. Implementations report failures through
/// [`ProviderError`], which the orchestrator surfaces without rewriting.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(
        &self,
        elements: &Payload,
        settings: &GenerationSettings,
    ) -> Result<String, ProviderError>;
}

// ============================================================================
// Orchestration
// ============================================================================

/// Errors from triggering generation on an output node.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    /// Nothing upstream has sent data to this node yet.
    #[error("connect this output node to story elements first")]
    #[diagnostic(
        code(storygraph::generation::missing_story_elements),
        help("Draw an edge into the output node, then use \"send forward\" on the upstream node.")
    )]
    MissingStoryElements,

    /// The trigger named a node that is not in the graph.
    #[error("no node with id {id}")]
    #[diagnostic(code(storygraph::generation::unknown_node))]
    UnknownNode { id: String },

    /// Generation was triggered on a non-output node.
    #[error("node {id} is not an output node")]
    #[diagnostic(
        code(storygraph::generation::not_an_output),
        help("Only output nodes carry generation settings; this is a caller bug.")
    )]
    NotAnOutputNode { id: String },

    /// A generation is already in flight; the second trigger is rejected.
    #[error("a story is already being generated")]
    #[diagnostic(code(storygraph::generation::already_generating))]
    AlreadyGenerating,

    /// The external capability failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Provider(#[from] ProviderError),
}

/// Everything a generation call needs, snapshotted at trigger time.
///
/// The graph stays editable while the call is in flight; the call
/// completes with this snapshot regardless of later edits.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub node_id: String,
    pub elements: Payload,
    pub settings: GenerationSettings,
}

/// Drives the generation cycle for output nodes.
pub struct GenerationOrchestrator {
    generator: Arc<dyn StoryGenerator>,
    emitter: EventEmitter,
    in_flight: AtomicBool,
}

impl GenerationOrchestrator {
    pub fn new(generator: Arc<dyn StoryGenerator>, emitter: EventEmitter) -> Self {
        Self {
            generator,
            emitter,
            in_flight: AtomicBool::new(false),
        }
    }

    /// CheckInput: validates the trigger and snapshots the call inputs.
    /// Fails without touching the capability.
    pub fn prepare(
        &self,
        graph: &GraphStore,
        node_id: &str,
    ) -> Result<GenerationRequest, GenerationError> {
        let node = graph.node(node_id).ok_or_else(|| GenerationError::UnknownNode {
            id: node_id.to_owned(),
        })?;
        if node.kind != NodeType::Output {
            return Err(GenerationError::NotAnOutputNode {
                id: node_id.to_owned(),
            });
        }
        let elements = node
            .received
            .clone()
            .ok_or(GenerationError::MissingStoryElements)?;
        Ok(GenerationRequest {
            node_id: node_id.to_owned(),
            elements,
            settings: GenerationSettings::from_payload(&node.data),
        })
    }

    /// Generating: runs the external call against the snapshot.
    ///
    /// Single-flight — a second trigger while one is awaiting resolves to
    /// [`GenerationError::AlreadyGenerating`]. No automatic retry: a failed
    /// call stays failed until the user triggers again.
    pub async fn run(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GenerationError::AlreadyGenerating);
        }
        let _guard = FlightGuard(&self.in_flight);

        self.emitter.emit(GraphEvent::GenerationStarted {
            node_id: request.node_id.clone(),
        });
        tracing::info!(
            node_id = %request.node_id,
            elements = request.elements.len(),
            "generation dispatched"
        );
        match self
            .generator
            .generate(&request.elements, &request.settings)
            .await
        {
            Ok(story) => {
                self.emitter.emit(GraphEvent::GenerationCompleted {
                    node_id: request.node_id.clone(),
                });
                Ok(story)
            }
            Err(err) => {
                tracing::warn!(node_id = %request.node_id, %err, "generation failed");
                self.emitter.emit(GraphEvent::GenerationFailed {
                    node_id: request.node_id.clone(),
                    message: err.to_string(),
                });
                Err(GenerationError::Provider(err))
            }
        }
    }

    /// Full trigger: CheckInput, then Generating against a snapshot taken
    /// before the first await.
    pub async fn generate(
        &self,
        graph: &GraphStore,
        node_id: &str,
    ) -> Result<String, GenerationError> {
        if self.is_generating() {
            return Err(GenerationError::AlreadyGenerating);
        }
        let request = self.prepare(graph, node_id)?;
        self.run(request).await
    }

    /// Whether a call is currently awaiting the capability.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Clears the in-flight flag when the call resolves or is cancelled.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

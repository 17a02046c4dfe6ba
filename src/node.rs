//! Story node and edge data shapes.
//!
//! A [`StoryNode`] is pure data: identity, kind, canvas position, a field
//! map, and the slot upstream sends write into. Editing operations are
//! commands keyed by node id (see [`GraphStore`](crate::graph::GraphStore)
//! and [`StorySession`](crate::app::StorySession)), so nodes carry no
//! callbacks and restore cleanly from snapshots.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::types::{NodeType, Position};

/// Field map used for node data and propagated payloads.
pub type Payload = FxHashMap<String, Value>;

/// A typed unit of story content in the graph.
///
/// `data` holds the kind-specific fields (see
/// [`factory::default_payload`](crate::factory::default_payload));
/// `received` is populated only by propagation and stays out of `data` so a
/// forward never re-broadcasts inbound content.
///
/// # Invariants
///
/// - `id` is unique across the live node set and immutable
/// - `kind` never changes after creation
/// - `received` is `None` until at least one propagation targets this node
#[derive(Clone, Debug, PartialEq)]
pub struct StoryNode {
    pub id: String,
    pub kind: NodeType,
    pub position: Position,
    /// Canvas selection flag; drives batch delete.
    pub selected: bool,
    pub data: Payload,
    /// Data delivered by upstream sends. Last writer wins.
    pub received: Option<Payload>,
}

impl StoryNode {
    /// Snapshot of the node's own fields, suitable for forwarding.
    ///
    /// The `received` slot is excluded by construction — it lives outside
    /// `data`.
    #[must_use]
    pub fn payload_snapshot(&self) -> Payload {
        self.data.clone()
    }

    /// Whether any upstream send has targeted this node yet.
    #[must_use]
    pub fn has_received(&self) -> bool {
        self.received.is_some()
    }
}

/// A directed connection from one node's output to another's input.
///
/// Handles are optional port discriminators for nodes exposing more than
/// one connection point. Duplicates of the same (source, target, handle)
/// triple are allowed: two independent connections are two edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl GraphEdge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    #[must_use]
    pub fn with_handles(
        mut self,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    /// Whether this edge touches `id` at either endpoint.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/*!
Snapshot persistence for the story graph.

Persisted shapes are explicit serde structs decoupled from the in-memory
[`GraphStore`], with conversion logic localized in `From`/`TryFrom` impls
so the adapter stays lean. The stored document is
`{"nodes": [...], "edges": [...]}` under a single fixed key; field names
stay camelCase so snapshots match what the canvas layer produces and
consumes.

Save/load is whole-graph replacement, not a merge: loading hands back a
fresh store and the caller discards whatever it held. Capabilities are
commands keyed by node id, so nothing function-valued is ever persisted
and nothing needs rebinding on restore.

This module does not perform I/O itself — blob backends live in [`store`].
*/

pub mod store;

use std::str::FromStr;
use std::sync::Arc;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{GraphError, GraphStore};
use crate::node::{GraphEdge, Payload, StoryNode};
use crate::types::{NodeType, Position, UnknownNodeTypeError};

pub use store::{InMemorySnapshotStore, SnapshotStore, StoreError};

#[cfg(feature = "sqlite")]
pub use store::SqliteSnapshotStore;

/// Persisted node shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub data: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_data: Option<Payload>,
}

/// Persisted edge shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEdge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// Whole-graph snapshot document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedGraph {
    #[serde(default)]
    pub nodes: Vec<PersistedNode>,
    #[serde(default)]
    pub edges: Vec<PersistedEdge>,
}

/// Errors raised while saving or restoring snapshots.
#[derive(Debug, Error, Diagnostic)]
pub enum PersistenceError {
    /// Save was triggered before any graph was attached to the session.
    #[error("no active graph to save")]
    #[diagnostic(
        code(storygraph::persistence::no_active_graph),
        help("Attach or create a graph before saving; there is nothing to snapshot.")
    )]
    NoActiveGraph,

    /// The stored blob does not have the expected node/edge shape.
    #[error("snapshot is malformed: {reason}")]
    #[diagnostic(
        code(storygraph::persistence::malformed_snapshot),
        help("The save data is corrupt; re-save the graph to replace it.")
    )]
    MalformedSnapshot { reason: String },

    /// JSON serialization failed on the save path.
    #[error("snapshot serialization failed: {source}")]
    #[diagnostic(code(storygraph::persistence::serde))]
    Serde {
        #[source]
        source: serde_json::Error,
    },

    /// Backend failure while reading or writing the blob.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

/* ---------- GraphStore <-> PersistedGraph conversions ---------- */

impl From<&StoryNode> for PersistedNode {
    fn from(node: &StoryNode) -> Self {
        PersistedNode {
            id: node.id.clone(),
            kind: node.kind.as_str().to_string(),
            position: node.position,
            selected: node.selected,
            data: node.data.clone(),
            received_data: node.received.clone(),
        }
    }
}

impl From<&GraphEdge> for PersistedEdge {
    fn from(edge: &GraphEdge) -> Self {
        PersistedEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_handle: edge.source_handle.clone(),
            target_handle: edge.target_handle.clone(),
        }
    }
}

impl From<&GraphStore> for PersistedGraph {
    fn from(graph: &GraphStore) -> Self {
        PersistedGraph {
            nodes: graph.nodes().iter().map(PersistedNode::from).collect(),
            edges: graph.edges().iter().map(PersistedEdge::from).collect(),
        }
    }
}

impl TryFrom<PersistedNode> for StoryNode {
    type Error = PersistenceError;

    fn try_from(p: PersistedNode) -> Result<Self, Self::Error> {
        let kind = NodeType::from_str(&p.kind).map_err(|UnknownNodeTypeError(t)| {
            PersistenceError::MalformedSnapshot {
                reason: format!("unknown node type {t:?}"),
            }
        })?;
        Ok(StoryNode {
            id: p.id,
            kind,
            position: p.position,
            selected: p.selected,
            data: p.data,
            received: p.received_data,
        })
    }
}

impl TryFrom<PersistedGraph> for GraphStore {
    type Error = PersistenceError;

    fn try_from(p: PersistedGraph) -> Result<Self, Self::Error> {
        let mut graph = GraphStore::new();
        for persisted in p.nodes {
            let node = StoryNode::try_from(persisted)?;
            graph.add_node(node).map_err(|err| match err {
                GraphError::DuplicateId { id } => PersistenceError::MalformedSnapshot {
                    reason: format!("duplicate node id {id:?}"),
                },
            })?;
        }
        for edge in p.edges {
            graph.add_edge(
                GraphEdge::new(edge.source, edge.target)
                    .with_handles(edge.source_handle, edge.target_handle),
            );
        }
        Ok(graph)
    }
}

/* ---------- Adapter ---------- */

/// Saves and restores whole graphs through a [`SnapshotStore`], addressed
/// by one fixed key.
pub struct PersistenceAdapter {
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serializes the graph under the adapter's key.
    ///
    /// `None` means no graph is attached yet and fails with
    /// [`PersistenceError::NoActiveGraph`].
    pub async fn save(&self, graph: Option<&GraphStore>) -> Result<(), PersistenceError> {
        let graph = graph.ok_or(PersistenceError::NoActiveGraph)?;
        let doc = PersistedGraph::from(graph);
        let blob =
            serde_json::to_string(&doc).map_err(|source| PersistenceError::Serde { source })?;
        self.store.put(&self.key, &blob).await?;
        tracing::info!(
            key = %self.key,
            nodes = doc.nodes.len(),
            edges = doc.edges.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Restores the graph saved under the adapter's key.
    ///
    /// `Ok(None)` when nothing was ever saved — the caller keeps its current
    /// graph.
    pub async fn load(&self) -> Result<Option<GraphStore>, PersistenceError> {
        let Some(blob) = self.store.get(&self.key).await? else {
            tracing::debug!(key = %self.key, "no snapshot under key");
            return Ok(None);
        };
        let doc: PersistedGraph =
            serde_json::from_str(&blob).map_err(|err| PersistenceError::MalformedSnapshot {
                reason: err.to_string(),
            })?;
        let graph = GraphStore::try_from(doc)?;
        tracing::info!(
            key = %self.key,
            nodes = graph.len(),
            edges = graph.edge_count(),
            "snapshot restored"
        );
        Ok(Some(graph))
    }
}

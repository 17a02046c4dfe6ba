//! The canonical node and edge collections and their mutation primitives.
//!
//! [`GraphStore`] exclusively owns the graph: nodes keep insertion order
//! (z-order for the canvas), ids are unique, and edges are an unordered
//! multiset. All mutation goes through store operations; the canvas layer
//! feeds position and selection changes in through the same surface.
//!
//! # Examples
//!
//! ```rust
//! use storygraph::factory::NodeFactory;
//! use storygraph::graph::GraphStore;
//! use storygraph::node::GraphEdge;
//! use storygraph::types::{NodeType, Position};
//!
//! let factory = NodeFactory::new();
//! let mut graph = GraphStore::new();
//! let idea = factory.create(NodeType::Idea, Position::default());
//! let id = idea.id.clone();
//! graph.add_node(idea)?;
//!
//! graph.set_selected(&id, true);
//! assert_eq!(graph.remove_selected(), 1);
//! assert!(graph.is_empty());
//! # Ok::<(), storygraph::graph::GraphError>(())
//! ```

use miette::Diagnostic;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::node::{GraphEdge, Payload, StoryNode};
use crate::types::Position;

/// Errors raised by graph mutations.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// A node with this id is already present.
    #[error("duplicate node id: {id}")]
    #[diagnostic(
        code(storygraph::graph::duplicate_id),
        help("Node ids come from the factory; inserting the same node twice is a caller bug.")
    )]
    DuplicateId { id: String },
}

/// Owns the canonical node and edge collections.
///
/// Node insertion order is z-order for rendering only; it carries no other
/// meaning. Edge endpoints reference live nodes — the removal paths cascade
/// so no dangling edge survives a node removal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStore {
    nodes: Vec<StoryNode>,
    edges: Vec<GraphEdge>,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The live node set, in z-order.
    #[must_use]
    pub fn nodes(&self) -> &[StoryNode] {
        &self.nodes
    }

    /// The edge multiset.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut StoryNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Inserts a node at the top of the z-order.
    pub fn add_node(&mut self, node: StoryNode) -> Result<(), GraphError> {
        if self.node(&node.id).is_some() {
            return Err(GraphError::DuplicateId { id: node.id });
        }
        tracing::debug!(id = %node.id, kind = %node.kind, "node added");
        self.nodes.push(node);
        Ok(())
    }

    /// Removes the node and every edge touching it. No-op for unknown ids.
    pub fn remove_node(&mut self, id: &str) {
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| !e.touches(id));
    }

    /// Appends an edge. No uniqueness constraint: duplicates of the same
    /// (source, target, handle) triple are independent connections.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        tracing::debug!(source = %edge.source, target = %edge.target, "edge added");
        self.edges.push(edge);
    }

    /// Removes every selected node, then every edge touching one.
    ///
    /// Node removal happens before edge filtering so the edge pass works
    /// against a fixed set of removed ids rather than re-deriving selection
    /// from a half-mutated structure. Returns the number of nodes removed.
    pub fn remove_selected(&mut self) -> usize {
        let doomed: FxHashSet<String> = self
            .nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect();
        if doomed.is_empty() {
            return 0;
        }
        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.edges
            .retain(|e| !doomed.contains(&e.source) && !doomed.contains(&e.target));
        tracing::debug!(count = doomed.len(), "selected nodes removed");
        doomed.len()
    }

    /// Shallow-merges `partial` into the node's field map.
    ///
    /// A missing id is a defined no-op — an edit racing a delete is dropped
    /// on the floor, matching the fire-and-forget editing surface.
    pub fn patch_node_data(&mut self, id: &str, partial: Payload) {
        match self.node_mut(id) {
            Some(node) => node.data.extend(partial),
            None => tracing::debug!(%id, "patch for missing node dropped"),
        }
    }

    /// Canvas mutation: move a node. No-op for unknown ids.
    pub fn set_position(&mut self, id: &str, position: Position) {
        if let Some(node) = self.node_mut(id) {
            node.position = position;
        }
    }

    /// Canvas mutation: flag a node (de)selected. No-op for unknown ids.
    pub fn set_selected(&mut self, id: &str, selected: bool) {
        if let Some(node) = self.node_mut(id) {
            node.selected = selected;
        }
    }

    /// Ids of every direct successor of `from`, one per edge — a doubled
    /// connection yields its target twice.
    pub fn successors<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a str> {
        self.edges
            .iter()
            .filter(move |e| e.source == from)
            .map(|e| e.target.as_str())
    }

    /// Overwrites the received slot of `id` with `payload`. Returns whether
    /// the node existed.
    pub(crate) fn deliver_received(&mut self, id: &str, payload: Payload) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.received = Some(payload);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

//! Node construction: identity, position, and per-kind default payloads.

use serde_json::json;

use crate::node::{Payload, StoryNode};
use crate::types::{NodeType, Position};
use crate::utils::id::fresh_node_id;

/// Builds new nodes with fresh ids and the default fields for their kind.
///
/// Editing capabilities are not bound here: operations on a node are
/// commands keyed by its id, so restored nodes need no rebinding —
/// kind-driven dispatch covers them.
///
/// # Examples
///
/// ```rust
/// use storygraph::factory::NodeFactory;
/// use storygraph::types::{NodeType, Position};
///
/// let node = NodeFactory::new().create(NodeType::Output, Position::new(10.0, 20.0));
/// assert_eq!(node.data["length"], "medium");
/// assert_eq!(node.data["creativity"], 5);
/// assert_eq!(node.data["tone"], "serious");
/// assert!(node.received.is_none());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeFactory;

impl NodeFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates a node of `kind` at `position` with the kind's default fields.
    ///
    /// The id is a fresh collision-resistant token; kind and id are fixed
    /// for the node's lifetime.
    #[must_use]
    pub fn create(&self, kind: NodeType, position: Position) -> StoryNode {
        let node = StoryNode {
            id: fresh_node_id(),
            kind,
            position,
            selected: false,
            data: default_payload(kind),
            received: None,
        };
        tracing::debug!(id = %node.id, %kind, "node created");
        node
    }
}

/// The default field map for each node kind.
///
/// | kind | fields |
/// |---|---|
/// | idea | `content: ""` |
/// | prompt | `content: ""` |
/// | development | `elementType: "character"`, `title: ""`, `content: ""` |
/// | structure | `structureType: "sequence"`, `title: ""`, `description: ""` |
/// | output | `length: "medium"`, `creativity: 5`, `tone: "serious"` |
#[must_use]
pub fn default_payload(kind: NodeType) -> Payload {
    let mut data = Payload::default();
    match kind {
        NodeType::Idea | NodeType::Prompt => {
            data.insert("content".into(), json!(""));
        }
        NodeType::Development => {
            data.insert("elementType".into(), json!("character"));
            data.insert("title".into(), json!(""));
            data.insert("content".into(), json!(""));
        }
        NodeType::Structure => {
            data.insert("structureType".into(), json!("sequence"));
            data.insert("title".into(), json!(""));
            data.insert("description".into(), json!(""));
        }
        NodeType::Output => {
            data.insert("length".into(), json!("medium"));
            data.insert("creativity".into(), json!(5));
            data.insert("tone".into(), json!("serious"));
        }
    }
    data
}

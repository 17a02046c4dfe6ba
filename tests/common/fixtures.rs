use std::sync::Arc;

use serde_json::Value;

use storygraph::app::{SessionConfig, StorySession};
use storygraph::factory::NodeFactory;
use storygraph::graph::GraphStore;
use storygraph::node::Payload;
use storygraph::persistence::InMemorySnapshotStore;
use storygraph::types::{NodeType, Position};

use super::generators::RecordingGenerator;

/// Session over an in-memory store with a recording generator.
pub fn memory_session() -> (StorySession, Arc<RecordingGenerator>) {
    let generator = Arc::new(RecordingGenerator::default());
    let session = StorySession::new(
        Arc::new(InMemorySnapshotStore::new()),
        generator.clone(),
        SessionConfig::default().with_save_key("test.save"),
    );
    (session, generator)
}

/// Adds a node of `kind` directly to a bare store, returning its id.
pub fn add_node(graph: &mut GraphStore, kind: NodeType) -> String {
    let node = NodeFactory::new().create(kind, Position::default());
    let id = node.id.clone();
    graph.add_node(node).expect("factory ids are unique");
    id
}

/// Single-entry payload, for patches and expected received data.
pub fn payload_of(field: &str, value: Value) -> Payload {
    let mut payload = Payload::default();
    payload.insert(field.to_owned(), value);
    payload
}

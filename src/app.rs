//! Editor session facade: the gesture surface the canvas layer drives.
//!
//! [`StorySession`] owns one graph (or none, before the canvas attaches),
//! the node factory, the persistence adapter, the generation orchestrator,
//! and the event bus the UI drains. Every user gesture — add a node,
//! connect two, edit a field, send forward, save, load, generate — is a
//! method here taking explicit node ids, so nothing closes over graph
//! state and restored graphs work without rebinding.

use std::sync::Arc;

use serde_json::json;

use crate::events::{EventBus, EventEmitter, GraphEvent};
use crate::factory::NodeFactory;
use crate::generation::{GenerationError, GenerationOrchestrator, StoryGenerator};
use crate::graph::GraphStore;
use crate::node::{GraphEdge, Payload, StoryNode};
use crate::persistence::{PersistenceAdapter, PersistenceError, SnapshotStore};
use crate::propagation;
use crate::types::{NodeType, Position};

/// Session configuration. The save key and database name resolve from the
/// environment (`STORYGRAPH_SAVE_KEY`, `STORYGRAPH_DB_NAME`) so deployments
/// can redirect them without code changes.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub save_key: String,
    pub db_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        dotenvy::dotenv().ok();
        Self {
            save_key: std::env::var("STORYGRAPH_SAVE_KEY")
                .unwrap_or_else(|_| "storygraph.save".to_string()),
            db_name: std::env::var("STORYGRAPH_DB_NAME")
                .unwrap_or_else(|_| "storygraph.db".to_string()),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_save_key(mut self, key: impl Into<String>) -> Self {
        self.save_key = key.into();
        self
    }

    #[must_use]
    pub fn with_db_name(mut self, name: impl Into<String>) -> Self {
        self.db_name = name.into();
        self
    }
}

/// One editor session over one story graph.
///
/// Editing gestures on a session whose canvas has not attached a graph yet
/// are warned no-ops; only [`save`](Self::save) reports the absence as an
/// error ([`PersistenceError::NoActiveGraph`]).
pub struct StorySession {
    graph: Option<GraphStore>,
    factory: NodeFactory,
    adapter: PersistenceAdapter,
    orchestrator: GenerationOrchestrator,
    bus: EventBus,
    emitter: EventEmitter,
    last_story: Option<String>,
}

impl StorySession {
    /// Session with an empty graph, ready to edit.
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        generator: Arc<dyn StoryGenerator>,
        config: SessionConfig,
    ) -> Self {
        let mut session = Self::detached(store, generator, config);
        session.graph = Some(GraphStore::new());
        session
    }

    /// Session with no graph attached yet (the canvas has not initialized).
    pub fn detached(
        store: Arc<dyn SnapshotStore>,
        generator: Arc<dyn StoryGenerator>,
        config: SessionConfig,
    ) -> Self {
        let bus = EventBus::new();
        let emitter = bus.emitter();
        let orchestrator = GenerationOrchestrator::new(generator, bus.emitter());
        Self {
            graph: None,
            factory: NodeFactory::new(),
            adapter: PersistenceAdapter::new(store, config.save_key),
            orchestrator,
            emitter,
            bus,
            last_story: None,
        }
    }

    /// Session backed by the SQLite snapshot store named in `config`.
    #[cfg(feature = "sqlite")]
    pub async fn with_sqlite(
        generator: Arc<dyn StoryGenerator>,
        config: SessionConfig,
    ) -> Result<Self, PersistenceError> {
        let store = crate::persistence::SqliteSnapshotStore::connect(&config.db_name).await?;
        Ok(Self::new(Arc::new(store), generator, config))
    }

    /// Attaches an empty graph if none is present (canvas init).
    pub fn attach_empty_graph(&mut self) {
        if self.graph.is_none() {
            self.graph = Some(GraphStore::new());
        }
    }

    #[must_use]
    pub fn graph(&self) -> Option<&GraphStore> {
        self.graph.as_ref()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.graph.as_ref().and_then(|g| g.node(id))
    }

    /// The most recently generated story, for the preview surface.
    #[must_use]
    pub fn last_story(&self) -> Option<&str> {
        self.last_story.as_deref()
    }

    /// Drains every event queued since the last drain.
    pub fn drain_events(&self) -> Vec<GraphEvent> {
        self.bus.drain()
    }

    /// Receiver half of the event bus, for a UI loop that blocks or selects.
    #[must_use]
    pub fn event_receiver(&self) -> flume::Receiver<GraphEvent> {
        self.bus.receiver()
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.orchestrator.is_generating()
    }

    fn graph_mut(&mut self, gesture: &'static str) -> Option<&mut GraphStore> {
        if self.graph.is_none() {
            tracing::warn!(gesture, "gesture before a graph is attached; ignored");
        }
        self.graph.as_mut()
    }

    // ------------------------------------------------------------------
    // Graph gestures
    // ------------------------------------------------------------------

    /// Adds a node of `kind` at `position`; returns its id.
    pub fn add_node(&mut self, kind: NodeType, position: Position) -> Option<String> {
        let factory = self.factory;
        let graph = self.graph_mut("add_node")?;
        let node = factory.create(kind, position);
        let id = node.id.clone();
        if let Err(err) = graph.add_node(node) {
            tracing::error!(%err, "factory produced a duplicate id");
            return None;
        }
        self.emitter.emit(GraphEvent::NodeAdded {
            id: id.clone(),
            kind,
        });
        Some(id)
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) {
        if let Some(graph) = self.graph_mut("remove_node") {
            graph.remove_node(id);
        }
    }

    /// Connects `source` to `target`. Duplicate connections are kept.
    pub fn connect(&mut self, source: &str, target: &str) {
        self.connect_via(source, None, target, None);
    }

    /// Connects `source` to `target` through specific ports.
    pub fn connect_via(
        &mut self,
        source: &str,
        source_handle: Option<String>,
        target: &str,
        target_handle: Option<String>,
    ) {
        let Some(graph) = self.graph_mut("connect") else {
            return;
        };
        graph.add_edge(
            GraphEdge::new(source, target).with_handles(source_handle, target_handle),
        );
        self.emitter.emit(GraphEvent::EdgeAdded {
            source: source.to_owned(),
            target: target.to_owned(),
        });
    }

    /// Batch delete of every selected node, edges included.
    pub fn remove_selected(&mut self) -> usize {
        let Some(graph) = self.graph_mut("remove_selected") else {
            return 0;
        };
        let removed = graph.remove_selected();
        if removed > 0 {
            self.emitter.emit(GraphEvent::NodesRemoved { count: removed });
        }
        removed
    }

    /// Applies a partial field update to a node. Missing ids are dropped.
    pub fn patch_node_data(&mut self, id: &str, partial: Payload) {
        if let Some(graph) = self.graph_mut("patch_node_data") {
            graph.patch_node_data(id, partial);
        }
    }

    /// Canvas mutation: move a node.
    pub fn set_position(&mut self, id: &str, position: Position) {
        if let Some(graph) = self.graph_mut("set_position") {
            graph.set_position(id, position);
        }
    }

    /// Canvas mutation: flag a node (de)selected.
    pub fn set_selected(&mut self, id: &str, selected: bool) {
        if let Some(graph) = self.graph_mut("set_selected") {
            graph.set_selected(id, selected);
        }
    }

    // ------------------------------------------------------------------
    // Field setters (one command per editor widget)
    // ------------------------------------------------------------------

    fn set_field(&mut self, id: &str, field: &str, value: serde_json::Value) {
        let mut patch = Payload::default();
        patch.insert(field.to_owned(), value);
        self.patch_node_data(id, patch);
    }

    /// Content textarea on idea, prompt, and development nodes.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) {
        self.set_field(id, "content", json!(content.into()));
    }

    /// Element-type selector on development nodes.
    pub fn set_element_type(&mut self, id: &str, element_type: impl Into<String>) {
        self.set_field(id, "elementType", json!(element_type.into()));
    }

    /// Title field on development and structure nodes.
    pub fn set_title(&mut self, id: &str, title: impl Into<String>) {
        self.set_field(id, "title", json!(title.into()));
    }

    /// Structure-type selector on structure nodes.
    pub fn set_structure_type(&mut self, id: &str, structure_type: impl Into<String>) {
        self.set_field(id, "structureType", json!(structure_type.into()));
    }

    /// Description field on structure nodes.
    pub fn set_description(&mut self, id: &str, description: impl Into<String>) {
        self.set_field(id, "description", json!(description.into()));
    }

    /// Story-length selector on output nodes.
    pub fn set_length(&mut self, id: &str, length: impl Into<String>) {
        self.set_field(id, "length", json!(length.into()));
    }

    /// Creativity slider on output nodes.
    pub fn set_creativity(&mut self, id: &str, creativity: u8) {
        self.set_field(id, "creativity", json!(creativity));
    }

    /// Tone selector on output nodes.
    pub fn set_tone(&mut self, id: &str, tone: impl Into<String>) {
        self.set_field(id, "tone", json!(tone.into()));
    }

    // ------------------------------------------------------------------
    // Propagation, persistence, generation
    // ------------------------------------------------------------------

    /// "Send forward" button: delivers the node's current fields one hop
    /// downstream. Returns the number of deliveries.
    pub fn send_data_forward(&mut self, id: &str) -> usize {
        let Some(graph) = self.graph_mut("send_data_forward") else {
            return 0;
        };
        let delivered = propagation::send_data_forward(graph, id);
        if delivered > 0 {
            self.emitter.emit(GraphEvent::DataDelivered {
                from: id.to_owned(),
                delivered,
            });
        }
        delivered
    }

    /// Snapshots the whole graph under the session's save key.
    pub async fn save(&self) -> Result<(), PersistenceError> {
        self.adapter.save(self.graph.as_ref()).await?;
        self.emitter.emit(GraphEvent::SnapshotSaved {
            key: self.adapter.key().to_owned(),
        });
        Ok(())
    }

    /// Replaces the in-memory graph with the saved snapshot, wholesale.
    ///
    /// Returns `false` (keeping the current graph) when nothing was ever
    /// saved under the session's key.
    pub async fn load(&mut self) -> Result<bool, PersistenceError> {
        match self.adapter.load().await? {
            Some(graph) => {
                self.emitter.emit(GraphEvent::SnapshotLoaded {
                    key: self.adapter.key().to_owned(),
                    nodes: graph.len(),
                    edges: graph.edge_count(),
                });
                self.graph = Some(graph);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Generate button on an output node.
    ///
    /// On success the text becomes the session's latest story, available
    /// through [`last_story`](Self::last_story) for the preview surface.
    pub async fn generate(&mut self, id: &str) -> Result<String, GenerationError> {
        let request = {
            let graph = self
                .graph
                .as_ref()
                .ok_or_else(|| GenerationError::UnknownNode { id: id.to_owned() })?;
            self.orchestrator.prepare(graph, id)?
        };
        let story = self.orchestrator.run(request).await?;
        self.last_story = Some(story.clone());
        Ok(story)
    }
}

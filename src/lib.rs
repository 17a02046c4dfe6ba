//! # Storygraph: Node-Graph Story Authoring Core
//!
//! Storygraph is the authoring core of a node-graph story editor: a directed
//! graph of typed story nodes, one-hop forward data propagation along edges,
//! whole-graph snapshot persistence, and the orchestration that feeds
//! collected story elements into an external generation capability.
//!
//! ## Core Concepts
//!
//! - **Nodes**: Typed units of story content (`idea`, `prompt`,
//!   `development`, `structure`, `output`) with per-kind default fields
//! - **Edges**: Directed connections from one node's output to another's input
//! - **Propagation**: Copying a node's current fields into the received slot
//!   of its direct successors — exactly one hop, never transitive
//! - **Snapshots**: Serializable `{nodes, edges}` captures saved under a
//!   single fixed key
//! - **Generation**: A terminal `output` node gathers what it received and
//!   hands it to an async [`StoryGenerator`](generation::StoryGenerator)
//!
//! The visual canvas, editor widgets, and the concrete generation service
//! live outside this crate. The canvas drives a
//! [`StorySession`](app::StorySession) through plain gestures and drains its
//! event bus for everything worth reflecting back to the user.
//!
//! ## Quick Start
//!
//! ### Building and propagating
//!
//! ```
//! use storygraph::factory::NodeFactory;
//! use storygraph::graph::GraphStore;
//! use storygraph::node::{GraphEdge, Payload};
//! use storygraph::propagation;
//! use storygraph::types::{NodeType, Position};
//!
//! let factory = NodeFactory::new();
//! let mut graph = GraphStore::new();
//!
//! let idea = factory.create(NodeType::Idea, Position::new(0.0, 0.0));
//! let prompt = factory.create(NodeType::Prompt, Position::new(240.0, 0.0));
//! let (idea_id, prompt_id) = (idea.id.clone(), prompt.id.clone());
//! graph.add_node(idea)?;
//! graph.add_node(prompt)?;
//! graph.add_edge(GraphEdge::new(idea_id.clone(), prompt_id.clone()));
//!
//! let mut patch = Payload::default();
//! patch.insert("content".into(), serde_json::json!("A lost key"));
//! graph.patch_node_data(&idea_id, patch);
//!
//! // One hop: the prompt node receives the idea's fields, nothing further.
//! propagation::send_data_forward(&mut graph, &idea_id);
//! assert!(graph.node(&prompt_id).unwrap().has_received());
//! # Ok::<(), storygraph::graph::GraphError>(())
//! ```
//!
//! ### Driving a session
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storygraph::app::{SessionConfig, StorySession};
//! use storygraph::persistence::InMemorySnapshotStore;
//! use storygraph::types::{NodeType, Position};
//! # use storygraph::generation::{GenerationSettings, ProviderError, StoryGenerator};
//! # use storygraph::node::Payload;
//! # struct Provider;
//! # #[async_trait::async_trait]
//! # impl StoryGenerator for Provider {
//! #     async fn generate(&self, _: &Payload, _: &GenerationSettings) -> Result<String, ProviderError> {
//! #         Ok("Once upon a time...".into())
//! #     }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = StorySession::new(
//!     Arc::new(InMemorySnapshotStore::new()),
//!     Arc::new(Provider),
//!     SessionConfig::default(),
//! );
//!
//! let dev = session.add_node(NodeType::Development, Position::new(0.0, 0.0)).unwrap();
//! let out = session.add_node(NodeType::Output, Position::new(0.0, 200.0)).unwrap();
//! session.set_title(&dev, "Mira");
//! session.set_content(&dev, "brave");
//! session.connect(&dev, &out);
//! session.send_data_forward(&dev);
//!
//! let _story = session.generate(&out).await?;
//! session.save().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Node kinds, the add-node catalog, canvas positions
//! - [`node`] - `StoryNode` and `GraphEdge` data shapes
//! - [`graph`] - `GraphStore`: the canonical collections and their mutations
//! - [`factory`] - Node construction and per-kind default payloads
//! - [`propagation`] - One-hop forward delivery along edges
//! - [`persistence`] - Snapshot models, the adapter, and blob stores
//! - [`generation`] - The generator seam and the orchestration state machine
//! - [`events`] - Flume-backed event fan-out toward the canvas layer
//! - [`app`] - `StorySession`: the gesture surface the canvas drives
//! - [`telemetry`] - Tracing subscriber installation

pub mod app;
pub mod events;
pub mod factory;
pub mod generation;
pub mod graph;
pub mod node;
pub mod persistence;
pub mod propagation;
pub mod telemetry;
pub mod types;
pub mod utils;

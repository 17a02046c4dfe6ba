//! Event fan-out toward the canvas/UI layer.
//!
//! The editor surface consumes these instead of polling the graph: node and
//! edge lifecycle, deliveries, snapshot activity, and the generation state
//! machine all announce themselves here. The bus is a thin flume channel;
//! emitters are cheap clones and never block or fail the producing
//! operation — a disconnected receiver just drops events.

use serde::{Deserialize, Serialize};

use crate::types::NodeType;

/// Something the canvas layer may want to reflect back to the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    NodeAdded {
        id: String,
        kind: NodeType,
    },
    EdgeAdded {
        source: String,
        target: String,
    },
    NodesRemoved {
        count: usize,
    },
    /// A send delivered the source's fields to `delivered` direct successors.
    DataDelivered {
        from: String,
        delivered: usize,
    },
    SnapshotSaved {
        key: String,
    },
    SnapshotLoaded {
        key: String,
        nodes: usize,
        edges: usize,
    },
    GenerationStarted {
        node_id: String,
    },
    GenerationCompleted {
        node_id: String,
    },
    /// Generation failed; `message` is the inline text for the output node.
    GenerationFailed {
        node_id: String,
        message: String,
    },
}

/// Cloneable producer handle onto an [`EventBus`].
#[derive(Clone, Debug)]
pub struct EventEmitter {
    tx: flume::Sender<GraphEvent>,
}

impl EventEmitter {
    /// Emits an event, silently dropping it if no receiver is left.
    pub fn emit(&self, event: GraphEvent) {
        let _ = self.tx.send(event);
    }
}

/// Unbounded fan-in bus owned by the session.
#[derive(Debug)]
pub struct EventBus {
    tx: flume::Sender<GraphEvent>,
    rx: flume::Receiver<GraphEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    #[must_use]
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            tx: self.tx.clone(),
        }
    }

    /// Receiver half, for a UI loop that wants to block or select.
    #[must_use]
    pub fn receiver(&self) -> flume::Receiver<GraphEvent> {
        self.rx.clone()
    }

    /// Drains everything currently queued. Never blocks.
    pub fn drain(&self) -> Vec<GraphEvent> {
        self.rx.try_iter().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

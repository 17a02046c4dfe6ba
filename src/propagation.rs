//! One-hop forward data propagation along graph edges.
//!
//! Delivery is exactly one hop: a node that receives data does not
//! re-propagate it; forwarding again takes another explicit send on that
//! node. Cycles are not detected — two mutually connected nodes simply
//! overwrite each other's received slot on successive manual sends, which
//! is accepted behavior rather than a condition to reject.

use crate::graph::GraphStore;
use crate::node::Payload;

/// Delivers `payload` to every direct successor of `from`, overwriting each
/// target's received slot (last writer wins — no merge, no history).
///
/// Returns the number of deliveries. A source with no outgoing edges is a
/// defined no-op returning 0, and the graph is left untouched.
pub fn deliver(graph: &mut GraphStore, from: &str, payload: Payload) -> usize {
    let targets: Vec<String> = graph.successors(from).map(str::to_owned).collect();
    if targets.is_empty() {
        tracing::debug!(%from, "no outgoing edges, nothing to deliver");
        return 0;
    }
    let mut delivered = 0;
    for target in targets {
        if graph.deliver_received(&target, payload.clone()) {
            tracing::debug!(%from, %target, "payload delivered");
            delivered += 1;
        }
    }
    delivered
}

/// Command form of a node's "send forward" button: snapshots the node's
/// current fields and delivers the snapshot one hop downstream.
///
/// The snapshot covers `data` only — inbound `received` content is never
/// re-broadcast. Terminal output nodes never forward, and a send from a
/// missing node is dropped like any other edit racing a delete; both
/// return 0.
pub fn send_data_forward(graph: &mut GraphStore, id: &str) -> usize {
    let Some(node) = graph.node(id) else {
        tracing::debug!(%id, "send from missing node dropped");
        return 0;
    };
    if node.kind.is_terminal() {
        tracing::warn!(%id, "output nodes are terminal and never forward");
        return 0;
    }
    let payload = node.payload_snapshot();
    deliver(graph, id, payload)
}

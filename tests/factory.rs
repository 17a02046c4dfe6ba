mod common;

use std::collections::HashSet;

use serde_json::json;
use storygraph::factory::{NodeFactory, default_payload};
use storygraph::node::Payload;
use storygraph::types::{NodeType, Position};

fn expected_defaults(kind: NodeType) -> Payload {
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

#[test]
fn default_payload_matches_the_table_for_every_kind() {
    let factory = NodeFactory::new();
    for kind in NodeType::ALL {
        let node = factory.create(kind, Position::default());
        assert_eq!(node.data, expected_defaults(kind), "defaults for {kind}");
        assert_eq!(node.data, default_payload(kind));
    }
}

#[test]
fn created_nodes_start_unselected_with_no_received_data() {
    let node = NodeFactory::new().create(NodeType::Idea, Position::new(3.0, 4.0));
    assert!(!node.selected);
    assert!(node.received.is_none());
    assert_eq!(node.position, Position::new(3.0, 4.0));
    assert_eq!(node.kind, NodeType::Idea);
}

#[test]
fn ten_thousand_creations_never_collide() {
    let factory = NodeFactory::new();
    let mut seen = HashSet::with_capacity(10_000);
    for _ in 0..10_000 {
        let node = factory.create(NodeType::Idea, Position::default());
        assert!(seen.insert(node.id.clone()), "id collided: {}", node.id);
    }
}

#[test]
fn catalog_covers_all_five_kinds_in_menu_order() {
    assert_eq!(NodeType::ALL.len(), 5);
    assert_eq!(NodeType::ALL[0].display_name(), "Idea Node");
    assert_eq!(NodeType::ALL[4].description(), "Generate the final story");
}

mod common;

use std::sync::Arc;

use common::*;
use serde_json::json;
use storygraph::app::{SessionConfig, StorySession};
use storygraph::persistence::{
    InMemorySnapshotStore, PersistedGraph, PersistenceAdapter, PersistenceError, SnapshotStore,
};
use storygraph::types::{NodeType, Position};

fn adapter_over(store: Arc<dyn SnapshotStore>) -> PersistenceAdapter {
    PersistenceAdapter::new(store, "test.save")
}

#[tokio::test]
async fn round_trip_restores_a_structurally_equal_graph() {
    let (mut session, _generator) = memory_session();
    let idea = session.add_node(NodeType::Idea, Position::new(0.0, 0.0)).unwrap();
    let dev = session.add_node(NodeType::Development, Position::new(120.0, 80.0)).unwrap();
    let out = session.add_node(NodeType::Output, Position::new(240.0, 160.0)).unwrap();
    session.set_content(&idea, "A lost key");
    session.set_title(&dev, "Mira");
    session.connect_via(&idea, Some("idea-out".into()), &dev, None);
    session.connect(&dev, &out);
    session.send_data_forward(&dev);
    session.set_selected(&idea, true);

    let original = session.graph().unwrap().clone();
    session.save().await.unwrap();

    // Mutate, then load: wholesale replacement, not a merge.
    session.add_node(NodeType::Structure, Position::default());
    session.remove_node(&idea);
    assert!(session.load().await.unwrap());

    let restored = session.graph().unwrap();
    assert_eq!(*restored, original);
    // The received slot survives the round trip.
    assert!(restored.node(&out).unwrap().has_received());
    assert!(restored.node(&idea).unwrap().selected);
}

#[tokio::test]
async fn load_with_nothing_saved_keeps_the_current_graph() {
    let (mut session, _generator) = memory_session();
    session.add_node(NodeType::Idea, Position::default());
    let before = session.graph().unwrap().clone();

    assert!(!session.load().await.unwrap());
    assert_eq!(*session.graph().unwrap(), before);
}

#[tokio::test]
async fn save_without_an_attached_graph_is_an_error() {
    let generator = Arc::new(RecordingGenerator::default());
    let session = StorySession::detached(
        Arc::new(InMemorySnapshotStore::new()),
        generator,
        SessionConfig::default().with_save_key("test.save"),
    );
    let err = session.save().await.unwrap_err();
    assert!(matches!(err, PersistenceError::NoActiveGraph));
}

#[tokio::test]
async fn detached_sessions_ignore_editing_gestures() {
    let generator = Arc::new(RecordingGenerator::default());
    let mut session = StorySession::detached(
        Arc::new(InMemorySnapshotStore::new()),
        generator,
        SessionConfig::default().with_save_key("test.save"),
    );
    assert!(session.add_node(NodeType::Idea, Position::default()).is_none());
    assert_eq!(session.send_data_forward("node_anything0"), 0);
    assert_eq!(session.remove_selected(), 0);
    assert!(session.graph().is_none());

    session.attach_empty_graph();
    assert!(session.add_node(NodeType::Idea, Position::default()).is_some());
}

#[tokio::test]
async fn malformed_blob_is_reported_as_corrupt() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    store.put("test.save", r#"{"nodes": 42}"#).await.unwrap();
    let err = adapter_over(store).load().await.unwrap_err();
    assert!(matches!(err, PersistenceError::MalformedSnapshot { .. }));
}

#[tokio::test]
async fn unknown_node_type_in_blob_is_reported_as_corrupt() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let blob = r#"{
        "nodes": [
            {"id": "node_000000001", "type": "chapter", "position": {"x": 0.0, "y": 0.0}}
        ],
        "edges": []
    }"#;
    store.put("test.save", blob).await.unwrap();
    let err = adapter_over(store).load().await.unwrap_err();
    match err {
        PersistenceError::MalformedSnapshot { reason } => {
            assert!(reason.contains("chapter"), "reason: {reason}");
        }
        other => panic!("expected MalformedSnapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn snapshot_document_uses_the_canvas_field_names() {
    let store = Arc::new(InMemorySnapshotStore::new());
    let (mut session, _generator) = {
        let generator = Arc::new(RecordingGenerator::default());
        (
            StorySession::new(
                store.clone(),
                generator.clone(),
                SessionConfig::default().with_save_key("test.save"),
            ),
            generator,
        )
    };
    let a = session.add_node(NodeType::Idea, Position::default()).unwrap();
    let b = session.add_node(NodeType::Prompt, Position::default()).unwrap();
    session.connect_via(&a, Some("out".into()), &b, Some("in".into()));
    session.send_data_forward(&a);
    session.save().await.unwrap();

    let blob = store.get("test.save").await.unwrap().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(doc["nodes"][0]["type"], "idea");
    assert_eq!(doc["edges"][0]["sourceHandle"], "out");
    assert_eq!(doc["edges"][0]["targetHandle"], "in");
    assert_eq!(doc["nodes"][1]["receivedData"]["content"], "");
    // Parses back into the persisted model too.
    let parsed: PersistedGraph = serde_json::from_str(&blob).unwrap();
    assert_eq!(parsed.nodes.len(), 2);
    assert_eq!(parsed.edges.len(), 1);
}

#[tokio::test]
async fn empty_snapshot_restores_an_empty_graph() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    store.put("test.save", r#"{"nodes": [], "edges": []}"#).await.unwrap();
    let graph = adapter_over(store).load().await.unwrap().unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use storygraph::persistence::{SnapshotStore, SqliteSnapshotStore};

    #[tokio::test]
    async fn sqlite_store_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.db");
        let store = SqliteSnapshotStore::connect(&path).await.unwrap();

        assert_eq!(store.get("graph.save").await.unwrap(), None);
        store.put("graph.save", r#"{"nodes":[],"edges":[]}"#).await.unwrap();
        assert_eq!(
            store.get("graph.save").await.unwrap().as_deref(),
            Some(r#"{"nodes":[],"edges":[]}"#)
        );

        // Same key, new blob: an overwrite, not a second row.
        store.put("graph.save", r#"{"nodes":[{"bad":true}]}"#).await.unwrap();
        assert_eq!(
            store.get("graph.save").await.unwrap().as_deref(),
            Some(r#"{"nodes":[{"bad":true}]}"#)
        );
    }

    #[tokio::test]
    async fn sqlite_store_reopens_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.db");
        {
            let store = SqliteSnapshotStore::connect(&path).await.unwrap();
            store.put("graph.save", "persisted").await.unwrap();
        }
        let reopened = SqliteSnapshotStore::connect(&path).await.unwrap();
        assert_eq!(
            reopened.get("graph.save").await.unwrap().as_deref(),
            Some("persisted")
        );
    }
}

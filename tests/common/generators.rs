use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use storygraph::generation::{GenerationSettings, ProviderError, StoryGenerator};
use storygraph::node::Payload;

/// Records every call and returns a canned story.
#[derive(Default)]
pub struct RecordingGenerator {
    pub calls: Mutex<Vec<(Payload, GenerationSettings)>>,
}

impl RecordingGenerator {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StoryGenerator for RecordingGenerator {
    async fn generate(
        &self,
        elements: &Payload,
        settings: &GenerationSettings,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((elements.clone(), settings.clone()));
        Ok("Once upon a time, a lost key opened the wrong door.".to_string())
    }
}

/// Always fails with a transport-style error.
pub struct FailingGenerator;

#[async_trait]
impl StoryGenerator for FailingGenerator {
    async fn generate(
        &self,
        _elements: &Payload,
        _settings: &GenerationSettings,
    ) -> Result<String, ProviderError> {
        Err(ProviderError {
            provider: "mock",
            message: "rate limited".to_string(),
        })
    }
}

/// Suspends until released, for in-flight behavior tests.
pub struct GatedGenerator {
    pub release: Arc<Notify>,
}

#[async_trait]
impl StoryGenerator for GatedGenerator {
    async fn generate(
        &self,
        _elements: &Payload,
        _settings: &GenerationSettings,
    ) -> Result<String, ProviderError> {
        self.release.notified().await;
        Ok("a story that took its time".to_string())
    }
}

//! Scripted provider for tests.

use super::{ChatParams, ChatProvider, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Mock chat provider that replays a fixed outcome and records prompts.
pub struct MockChatProvider {
    outcome: Result<String, ProviderError>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockChatProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(text.into()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<String, ProviderError>) -> Self {
        Self {
            outcome,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering, to simulate a slow upstream.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, prompt: &str, _params: &ChatParams) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.outcome.clone()
    }
}

//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::state::App;
use crate::inference::{CompletionClient, ProviderError};

/// A client that answers every prompt with a fixed reply or a fixed failure,
/// and remembers what it was asked.
pub struct ScriptedClient {
    outcome: Result<String, ProviderError>,
    pub calls: AtomicUsize,
    pub last_prompt: std::sync::Mutex<Option<String>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Self {
        Self::with_outcome(Ok(text.to_string()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<String, ProviderError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_prompt: std::sync::Mutex::new(None),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.outcome.clone()
    }
}

/// A client whose call never settles.
pub struct HangingClient;

#[async_trait]
impl CompletionClient for HangingClient {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        std::future::pending().await
    }
}

/// A client that panics mid-call.
pub struct PanickingClient;

#[async_trait]
impl CompletionClient for PanickingClient {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        panic!("client blew up")
    }
}

/// Creates a test App with a working client.
pub fn test_app() -> App {
    App::new(
        Ok(Arc::new(ScriptedClient::replying("ok"))),
        "test-model".to_string(),
    )
}

/// Creates a test App whose client failed to build.
pub fn unavailable_app() -> App {
    App::new(
        Err(ProviderError::Config("missing key".to_string())),
        "test-model".to_string(),
    )
}

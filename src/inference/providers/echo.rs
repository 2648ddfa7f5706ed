//! Offline client that answers without touching the network.
//!
//! Useful for trying the interface without an API key. It waits a fixed
//! delay, then parrots the prompt back.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::inference::{CompletionClient, ProviderError};

pub const DEFAULT_ECHO_DELAY: Duration = Duration::from_millis(1500);

pub struct EchoClient {
    delay: Duration,
}

impl EchoClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The canned reply for a given prompt.
    pub fn reply_for(prompt: &str) -> String {
        format!("You said: \"{prompt}\". I am an agent and I'm still learning!")
    }
}

impl Default for EchoClient {
    fn default() -> Self {
        Self::new(DEFAULT_ECHO_DELAY)
    }
}

#[async_trait]
impl CompletionClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!("Echo client sleeping {:?}", self.delay);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::reply_for(prompt))
    }
}

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Errors that can occur while building or calling a completion client.
/// Every variant is terminal for the request; nothing is retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Client misconfigured (missing or blank API key). Detected before any call.
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// API returned a non-success status.
    Api { status: u16, message: String },
    /// The response body could not be understood.
    Parse(String),
    /// The call did not settle within the configured timeout.
    Timeout(Duration),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::Timeout(after) => {
                write!(f, "no response after {}s", after.as_secs())
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// A remote capability that turns one prompt into one generated reply.
///
/// Calls are stateless from the remote's point of view: the prompt is the
/// whole input, no conversation history travels with it.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the name of the client, for logs and the title bar.
    fn name(&self) -> &str;

    /// Submits `prompt` and resolves to the completion text or a failure.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Outcome of building the client at startup.
///
/// `Err` means the remote is unavailable for the whole session; the
/// controller checks this before touching the network.
pub type ClientHandle = Result<Arc<dyn CompletionClient>, ProviderError>;

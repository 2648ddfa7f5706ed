pub mod provider;
pub mod providers;

use std::sync::Arc;

use log::{info, warn};

use crate::Provider;
use crate::core::config::ResolvedConfig;

pub use provider::{ClientHandle, CompletionClient, ProviderError};
pub use providers::{EchoClient, OpenRouterClient};

/// Build the completion client once, up front.
///
/// A missing or blank credential yields `Err(ProviderError::Config)` here,
/// so the controller can refuse to contact the remote without ever trying.
pub fn build_client(config: &ResolvedConfig) -> ClientHandle {
    let client: Arc<dyn CompletionClient> = match config.provider {
        Provider::Echo => Arc::new(EchoClient::new(config.echo_delay)),
        Provider::OpenRouter => {
            let api_key = config
                .openrouter_api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    warn!("OpenRouter API key missing; remote completion disabled");
                    ProviderError::Config(
                        "OpenRouter API key not set (config file or OPENROUTER_API_KEY)"
                            .to_string(),
                    )
                })?;
            Arc::new(OpenRouterClient::new(
                api_key.to_string(),
                config.model_name.clone(),
                Some(config.openrouter_base_url.clone()),
            ))
        }
    };
    info!("Completion client ready: {}", client.name());
    Ok(client)
}

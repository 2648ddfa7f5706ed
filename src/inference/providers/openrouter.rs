//! OpenRouter client using the Chat Completions API.
//!
//! Each call sends a single `user` message. The endpoint is stateless, and
//! Courier deliberately does not replay history, so the prompt is the whole
//! request.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::{CompletionClient, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Builds the request body for a single stateless prompt.
fn prompt_to_request<'a>(model: &'a str, prompt: &str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
    }
}

/// Pulls the reply text out of a decoded response.
fn first_choice_text(response: ChatResponse) -> Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::Parse("no valid response from API".to_string()))
}

// ============================================================================
// Client Implementation
// ============================================================================

pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterClient {
    /// Creates a new OpenRouter client.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `model` - Model identifier sent with every request
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = prompt_to_request(&self.model, prompt);
        info!(
            "OpenRouter chat request: model={}, prompt_len={}",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("OpenRouter response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OpenRouter API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let decoded: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text = first_choice_text(decoded)?;
        info!("OpenRouter reply received: {} bytes", text.len());
        Ok(text)
    }
}

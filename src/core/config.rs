//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.courier/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Provider;
use crate::inference::providers::echo::DEFAULT_ECHO_DELAY;
use crate::inference::providers::openrouter::DEFAULT_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_provider: Option<Provider>,
    pub default_model: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub welcome_message: Option<String>,
    pub echo_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "nvidia/nemotron-nano-12b-v2-vl:free";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub model_name: String,
    /// `None` waits for the remote indefinitely.
    pub request_timeout: Option<Duration>,
    pub welcome_message: Option<String>,
    pub echo_delay: Duration,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.courier/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".courier").join("config.toml"))
}

/// Load config from `~/.courier/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CourierConfig::default()`.
pub fn load_config() -> Result<CourierConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(CourierConfig::default());
    };
    load_config_from(&path)
}

/// Load config from an explicit path. Malformed TOML is a `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<CourierConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(CourierConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CourierConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // api_key stays out of the log
    debug!(
        "Config: general={:?}, openrouter.base_url={:?}",
        config.general, config.openrouter.base_url
    );
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Courier Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_provider = "openrouter"    # "openrouter" or "echo"
# default_model = "nvidia/nemotron-nano-12b-v2-vl:free"
# request_timeout_secs = 60          # unset = wait indefinitely
# welcome_message = "Hi! Ask me anything."
# echo_delay_ms = 1500               # reply delay for the offline echo provider

# [openrouter]
# api_key = "sk-or-..."              # Or set OPENROUTER_API_KEY env var
# base_url = "https://openrouter.ai/api/v1"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve against the real process environment.
pub fn resolve(
    config: &CourierConfig,
    cli_provider: Option<Provider>,
    cli_model: Option<&str>,
) -> ResolvedConfig {
    resolve_with(config, cli_provider, cli_model, |key| std::env::var(key).ok())
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `env` looks up an environment variable by name.
pub fn resolve_with(
    config: &CourierConfig,
    cli_provider: Option<Provider>,
    cli_model: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli_provider
        .or_else(|| env("COURIER_PROVIDER").and_then(|s| parse_provider(&s)))
        .or(config.general.default_provider)
        .unwrap_or_default();

    // Model: CLI → env → config → default
    let model_name = cli_model
        .map(str::to_string)
        .or_else(|| env("COURIER_MODEL"))
        .or_else(|| config.general.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // Credential: env → config
    let openrouter_api_key = env("OPENROUTER_API_KEY").or_else(|| config.openrouter.api_key.clone());

    let openrouter_base_url = env("OPENROUTER_BASE_URL")
        .or_else(|| config.openrouter.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    ResolvedConfig {
        provider,
        model_name,
        request_timeout: config
            .general
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        welcome_message: config
            .general
            .welcome_message
            .clone()
            .filter(|m| !m.trim().is_empty()),
        echo_delay: config
            .general
            .echo_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_ECHO_DELAY),
        openrouter_api_key,
        openrouter_base_url,
    }
}

fn parse_provider(value: &str) -> Option<Provider> {
    match value.trim().to_ascii_lowercase().as_str() {
        "openrouter" => Some(Provider::OpenRouter),
        "echo" => Some(Provider::Echo),
        other => {
            warn!("Ignoring unknown COURIER_PROVIDER value '{}'", other);
            None
        }
    }
}

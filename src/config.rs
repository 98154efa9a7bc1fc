//! Configuration for CodePilot
//!
//! Settings are layered with the `config` crate:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config`)
//! 3. Environment overrides (`CODEPILOT__GATEWAY__MODEL=...`)
//!
//! The gateway API key additionally falls back to `GEMINI_API_KEY`.

use crate::error::{CodePilotError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the generative service API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Prefix for environment overrides
const ENV_PREFIX: &str = "CODEPILOT";

/// Generative service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API key (empty means "read from GEMINI_API_KEY")
    pub api_key: String,

    /// Model to use (default: gemini-1.5-flash)
    pub model: String,

    /// Base URL of the Generative Language API
    pub endpoint: String,

    /// Deadline for a single call, in seconds
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    /// Call deadline as a duration
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout_secs == 0 {
            return Err(CodePilotError::Config(config::ConfigError::Message(
                "gateway.timeout_secs must be greater than zero".to_string(),
            )));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    /// Resolve the API key from the config file or the environment
    pub fn resolve_api_key(&self) -> Result<String> {
        if !self.api_key.is_empty() {
            debug!("Using API key from configuration");
            return Ok(self.api_key.clone());
        }

        match env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => {
                debug!("Using API key from {} environment variable", API_KEY_ENV);
                Ok(key)
            }
            _ => Err(CodePilotError::Config(config::ConfigError::Message(format!(
                "API key not found. Set {} or gateway.api_key in the config file",
                API_KEY_ENV
            )))),
        }
    }
}

/// Suggestion pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    /// Quiet period before a suggestion request fires, in milliseconds
    pub quiet_period_ms: u64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            quiet_period_ms: 2000,
        }
    }
}

impl SuggestionSettings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodePilotConfig {
    pub gateway: GatewayConfig,
    pub suggestions: SuggestionSettings,
}

impl CodePilotConfig {
    /// Load configuration from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let loaded: CodePilotConfig = settings.try_deserialize()?;
        loaded.gateway.timeout()?;
        Ok(loaded)
    }
}

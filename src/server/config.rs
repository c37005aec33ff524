//! Server configuration types

use serde::{Deserialize, Serialize};
use toplus_core::ReviewConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Provider settings; credentials come from the environment, never from here
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub anthropic: ProviderSettings,
    #[serde(default)]
    pub gemini: ProviderSettings,
    #[serde(default)]
    pub openai: ProviderSettings,
    #[serde(default)]
    pub languagetool: ProviderSettings,
}

/// Per-provider overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Register the provider when its credential is present
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Model name (generative providers only)
    #[serde(default)]
    pub model: Option<String>,
    /// Per-call timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// API base URL
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
            timeout_secs: None,
            base_url: None,
        }
    }
}

impl ProviderSettings {
    /// Configured timeout
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }
}

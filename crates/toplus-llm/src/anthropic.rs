//! Anthropic - Claude API provider
//!
//! This module implements the Anthropic Claude provider using reqwest.

use crate::error::{Error, Result};
use crate::transform::{compose_prompt, TextTransform, EDITOR_SYSTEM_PROMPT};
use crate::util::{env_non_empty, mask_api_key, sanitize_api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Anthropic API version
const API_VERSION: &str = "2023-06-01";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ResponseContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    r#type: String,
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Anthropic provider configuration
#[derive(Clone)]
pub struct AnthropicConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Default model
    pub model: String,
    /// Max tokens per response
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnthropicConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            timeout: Duration::from_secs(60),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = env_non_empty("ANTHROPIC_API_KEY")
            .ok_or_else(|| Error::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = env_non_empty("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Anthropic Claude provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(AnthropicConfig::from_env()?)
    }

    async fn send_request(&self, request: AnthropicRequest) -> Result<AnthropicResponse> {
        let url = format!("{}/v1/messages", self.config.base_url);

        debug!("Sending request to Anthropic: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, self.config.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_reqwest(e, self.config.timeout))?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(Error::RateLimit);
            }
            if let Ok(error) = serde_json::from_str::<AnthropicError>(&body) {
                return Err(Error::Api(sanitize_api_error(&format!(
                    "{}: {}",
                    error.error.r#type, error.error.message
                ))));
            }
            return Err(Error::Api(sanitize_api_error(&format!(
                "HTTP {}: {}",
                status, body
            ))));
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TextTransform for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, text, instruction), fields(model = %self.config.model))]
    async fn transform(&self, text: &str, instruction: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: EDITOR_SYSTEM_PROMPT.to_string(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: compose_prompt(instruction, text),
            }],
            temperature: None,
        };

        let response = self.send_request(request).await?;

        let content = response
            .content
            .iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text.as_str()),
                ResponseContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        let content = content.trim();
        if content.is_empty() {
            return Err(Error::InvalidResponse("empty content".to_string()));
        }
        Ok(content.to_string())
    }
}

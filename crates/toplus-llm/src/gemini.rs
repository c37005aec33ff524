//! Gemini - Google Gemini API provider
//!
//! API-key authentication only (`?key=` query parameter).

use crate::error::{Error, Result};
use crate::transform::{compose_prompt, TextTransform, EDITOR_SYSTEM_PROMPT};
use crate::util::{env_non_empty, mask_api_key, sanitize_api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Low temperature keeps the model from adding conversational filler
const DEFAULT_TEMPERATURE: f32 = 0.1;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiContent,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Model
    pub model: String,
    /// Max output tokens
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask credentials
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 8192,
            timeout: Duration::from_secs(30),
        }
    }

    /// Create configuration from `GEMINI_API_KEY` (or `GOOGLE_API_KEY`)
    pub fn from_env() -> Result<Self> {
        let api_key = env_non_empty("GEMINI_API_KEY")
            .or_else(|| env_non_empty("GOOGLE_API_KEY"))
            .ok_or_else(|| Error::NotConfigured("GEMINI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
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

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    async fn send_request(&self, request: &GeminiRequest) -> Result<GeminiResponse> {
        // SECURITY: Don't log the full URL (contains the API key)
        debug!("Sending request to Gemini model: {}", self.config.model);

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(request)
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
            return Err(Error::Api(sanitize_api_error(&format!(
                "HTTP {}: {}",
                status, body
            ))));
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TextTransform for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, text, instruction), fields(model = %self.config.model))]
    async fn transform(&self, text: &str, instruction: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(compose_prompt(instruction, text)),
                }],
            }],
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(EDITOR_SYSTEM_PROMPT.to_string()),
                }],
            },
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: self.config.max_tokens,
            },
        };

        self.send_request(&request)
            .await?
            .into_text()
            .ok_or_else(|| Error::InvalidResponse("no candidate text".to_string()))
    }
}

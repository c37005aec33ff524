//! OpenAI - Chat Completions provider (GPT-4o)

use crate::error::{Error, Result};
use crate::transform::{TextTransform, EDITOR_SYSTEM_PROMPT};
use crate::util::{env_non_empty, mask_api_key, sanitize_api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI provider configuration
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Model
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            timeout: Duration::from_secs(30),
        }
    }

    /// Create configuration from `OPENAI_API_KEY`
    pub fn from_env() -> Result<Self> {
        let api_key = env_non_empty("OPENAI_API_KEY")
            .ok_or_else(|| Error::NotConfigured("OPENAI_API_KEY not set".to_string()))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = env_non_empty("OPENAI_BASE_URL") {
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

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }
}

#[async_trait::async_trait]
impl TextTransform for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, text, instruction), fields(model = %self.config.model))]
    async fn transform(&self, text: &str, instruction: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(format!("{EDITOR_SYSTEM_PROMPT}\n\n{instruction}")),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(text.to_string()),
                },
            ],
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!("Sending request to OpenAI: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
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
            return Err(Error::Api(sanitize_api_error(&format!(
                "HTTP {}: {}",
                status, body
            ))));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::InvalidResponse("no choices".to_string()))
    }
}

//! LanguageTool - grammar checking API
//!
//! Works against the free public endpoint; premium credentials
//! (`LANGUAGETOOL_USERNAME` + `LANGUAGETOOL_API_KEY`) are optional.

use crate::error::{Error, Result};
use crate::transform::{GrammarChecker, GrammarMatch};
use crate::util::{env_non_empty, mask_api_key, sanitize_api_error};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://api.languagetool.org";

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    offset: usize,
    length: usize,
    #[serde(default)]
    message: String,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    value: String,
}

/// LanguageTool configuration
#[derive(Clone)]
pub struct LanguageToolConfig {
    /// Base URL
    pub base_url: String,
    /// Premium account (username, api key)
    pub credentials: Option<(String, String)>,
    /// Request timeout
    pub timeout: Duration,
}

impl fmt::Debug for LanguageToolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credentials = self
            .credentials
            .as_ref()
            .map(|(user, key)| format!("{}:{}", user, mask_api_key(key)));
        f.debug_struct("LanguageToolConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LanguageToolConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl LanguageToolConfig {
    /// Configuration from environment; never fails since the public API needs no key
    #[must_use]
    pub fn from_env() -> Self {
        let credentials = env_non_empty("LANGUAGETOOL_USERNAME")
            .zip(env_non_empty("LANGUAGETOOL_API_KEY"));
        let base_url =
            env_non_empty("LANGUAGETOOL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            credentials,
            ..Self::default()
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// LanguageTool grammar checker
pub struct LanguageToolChecker {
    client: Client,
    config: LanguageToolConfig,
}

impl LanguageToolChecker {
    /// Create a new checker
    pub fn new(config: LanguageToolConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl GrammarChecker for LanguageToolChecker {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn check(&self, text: &str, language: &str) -> Result<Vec<GrammarMatch>> {
        let url = format!("{}/v2/check", self.config.base_url);
        debug!("Sending request to LanguageTool: {}", url);

        let mut form = vec![("text", text), ("language", language)];
        if let Some((username, api_key)) = &self.config.credentials {
            form.push(("username", username.as_str()));
            form.push(("apiKey", api_key.as_str()));
        }

        let response = self
            .client
            .post(&url)
            .form(&form)
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

        let parsed: CheckResponse =
            serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Ok(convert_matches(text, parsed.matches))
    }
}

/// LanguageTool reports offsets in UTF-16 code units; convert them to
/// character offsets so callers can index by `char`.
fn convert_matches(text: &str, raw: Vec<RawMatch>) -> Vec<GrammarMatch> {
    let utf16_to_char = utf16_index_table(text);
    let to_char = |utf16: usize| -> usize {
        utf16_to_char
            .get(utf16)
            .copied()
            .unwrap_or_else(|| text.chars().count())
    };

    raw.into_iter()
        .filter_map(|m| {
            let Some(utf16_end) = m.offset.checked_add(m.length) else {
                debug!(offset = m.offset, length = m.length, "Dropping overflowing match");
                return None;
            };
            let start = to_char(m.offset);
            let end = to_char(utf16_end);
            Some(GrammarMatch {
                offset: start,
                length: end.saturating_sub(start),
                replacements: m.replacements.into_iter().map(|r| r.value).collect(),
                message: m.message,
            })
        })
        .collect()
}

/// Map every UTF-16 position to the index of the char it falls in
fn utf16_index_table(text: &str) -> Vec<usize> {
    let mut table = Vec::with_capacity(text.len() + 1);
    let mut char_count = 0;
    for (char_idx, c) in text.chars().enumerate() {
        for _ in 0..c.len_utf16() {
            table.push(char_idx);
        }
        char_count = char_idx + 1;
    }
    table.push(char_count);
    table
}

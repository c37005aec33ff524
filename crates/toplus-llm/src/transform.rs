//! Provider traits
//!
//! Every external service is reached through one of two capabilities:
//! a free-form [`TextTransform`] (generative models, local rules) or a
//! positional [`GrammarChecker`] (LanguageTool).

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// System prompt shared by all generative providers
pub const EDITOR_SYSTEM_PROMPT: &str = "You are a strict text editing engine for educational content.
CRITICAL RULES:
1. Output ONLY the processed text. No polite introductions or explanations.
2. CONTEXT IS KING: Ensure the result makes logical sense. Do not produce sentences that are grammatically correct but semantically nonsense.
3. If the input is broken or nonsensical, fix it to be meaningful based on context.
4. Preserve the core meaning absolutely while improving clarity.";

/// Build the user turn sent to a generative provider
#[must_use]
pub fn compose_prompt(instruction: &str, text: &str) -> String {
    format!("{instruction}\n\n{text}")
}

/// A uniform text-transformation capability
///
/// Implementations make at most one outbound call per invocation and never
/// retry; retry and fallback belong to [`crate::FallbackChain`].
#[async_trait::async_trait]
pub trait TextTransform: Send + Sync {
    /// Provider label reported as `tool_used`
    fn name(&self) -> &str;

    /// Transform `text` according to `instruction`
    async fn transform(&self, text: &str, instruction: &str) -> Result<String>;
}

/// One positional correction suggested by a grammar checker
///
/// `offset` and `length` are counted in characters against the text that was
/// submitted for checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarMatch {
    /// Character offset of the flagged span
    pub offset: usize,
    /// Character length of the flagged span
    pub length: usize,
    /// Suggested replacements, best first
    pub replacements: Vec<String>,
    /// Human readable explanation
    pub message: String,
}

impl GrammarMatch {
    /// Create a match with a single replacement
    #[must_use]
    pub fn new(offset: usize, length: usize, replacement: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            replacements: vec![replacement.into()],
            message: String::new(),
        }
    }

    /// Attach an explanation
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The preferred replacement, if the checker suggested any
    #[must_use]
    pub fn best_replacement(&self) -> Option<&str> {
        self.replacements.first().map(String::as_str)
    }
}

/// A grammar checker returning positional matches
#[async_trait::async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Check `text` in the given language code (`auto`, `ko`, `en-US`, ...)
    async fn check(&self, text: &str, language: &str) -> Result<Vec<GrammarMatch>>;
}

//! Local rule-based provider
//!
//! Deterministic phrase substitutions that need no network access. Used as
//! the last link of the simplify and grammar stage chains when enabled.

use crate::error::Result;
use crate::transform::TextTransform;

/// Intensifiers dropped by the simplify rules
pub const SIMPLIFY_RULES: &[(&str, &str)] = &[("매우 ", ""), ("정말 ", ""), ("아주 ", "")];

/// Common Korean spelling mistakes fixed by the grammar rules
pub const SPELLING_RULES: &[(&str, &str)] = &[("되요", "돼요"), ("됬", "됐"), ("않됩", "안 됩")];

/// A provider applying a fixed list of literal replacements
pub struct RuleBasedProvider {
    name: String,
    rules: &'static [(&'static str, &'static str)],
}

impl RuleBasedProvider {
    /// Create a provider from a rule table
    #[must_use]
    pub fn new(name: impl Into<String>, rules: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Provider that drops intensifiers
    #[must_use]
    pub fn simplify() -> Self {
        Self::new("local-simplify", SIMPLIFY_RULES)
    }

    /// Provider that fixes common spelling mistakes
    #[must_use]
    pub fn spelling() -> Self {
        Self::new("local-spelling", SPELLING_RULES)
    }

    /// Apply every rule in order
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

#[async_trait::async_trait]
impl TextTransform for RuleBasedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, text: &str, _instruction: &str) -> Result<String> {
        Ok(self.apply(text))
    }
}

//! Review configuration
//!
//! Deserialized from the `[review]` table of the application config. Chains
//! are lists of provider names in priority order; names without a
//! registered provider are dropped when the chain is built.

use serde::{Deserialize, Serialize};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// Review settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Longest accepted input, in characters
    pub max_text_chars: usize,
    /// Grade used by the recycling check when the caller gives none
    pub default_target_grade: String,
    /// Append the local rule providers to the simplify and grammar stage chains
    pub local_rules: bool,
    /// Provider chains
    pub chains: ChainConfig,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 20_000,
            default_target_grade: "M1".to_string(),
            local_rules: false,
            chains: ChainConfig::default(),
        }
    }
}

/// Named provider chains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Workflow steps, diagnosis and recycling
    pub generative: Vec<String>,
    /// Grammar correction when the grammar checker is unreachable
    pub grammar_fallback: Vec<String>,
    /// Six-stage passthrough
    pub stages: StageChainConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            generative: names(&["anthropic", "gemini", "openai"]),
            grammar_fallback: names(&["gemini", "anthropic", "openai"]),
            stages: StageChainConfig::default(),
        }
    }
}

/// One chain per passthrough stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct StageChainConfig {
    pub simplify: Vec<String>,
    pub grammar: Vec<String>,
    pub tone: Vec<String>,
    pub style: Vec<String>,
    pub sensitivity: Vec<String>,
    pub final_review: Vec<String>,
}

impl Default for StageChainConfig {
    fn default() -> Self {
        let gemini_first = names(&["gemini", "anthropic", "openai"]);
        Self {
            simplify: names(&["openai", "gemini", "anthropic"]),
            grammar: gemini_first.clone(),
            tone: gemini_first.clone(),
            style: gemini_first.clone(),
            sensitivity: names(&["openai", "gemini", "anthropic"]),
            final_review: gemini_first,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReviewConfig::default();
        assert_eq!(config.max_text_chars, 20_000);
        assert_eq!(config.default_target_grade, "M1");
        assert!(!config.local_rules);
        assert_eq!(config.chains.generative[0], "anthropic");
        assert_eq!(config.chains.stages.grammar[0], "gemini");
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ReviewConfig = serde_json::from_str(
            r#"{"local_rules": true, "chains": {"generative": ["openai"]}}"#,
        )
        .unwrap();
        assert!(config.local_rules);
        assert_eq!(config.chains.generative, vec!["openai"]);
        assert_eq!(
            config.chains.grammar_fallback,
            ChainConfig::default().grammar_fallback
        );
        assert_eq!(config.max_text_chars, 20_000);
    }
}

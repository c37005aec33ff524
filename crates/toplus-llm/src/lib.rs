//! TOPLUS LLM - text-transform provider abstraction
//!
//! This crate provides the provider layer for TOPLUS:
//! - Transform: `TextTransform` and `GrammarChecker` traits
//! - Chain: ordered fallback execution with echo on total outage
//! - Registry: named providers resolved into chains from configuration
//! - Anthropic: Claude models
//! - Gemini: Google Gemini models
//! - OpenAI: GPT-4o chat completions
//! - LanguageTool: grammar checking with positional matches
//! - Local: deterministic rule-based substitutions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod anthropic;
pub mod chain;
pub mod error;
pub mod gemini;
pub mod languagetool;
pub mod local;
pub mod mock;
pub mod openai;
pub mod registry;
pub mod transform;
pub mod util;

pub use chain::{ChainOutput, FallbackChain, NO_PROVIDER};
pub use error::{Error, FailureKind, Result};
pub use mock::{Reply, ScriptedProvider};
pub use registry::ProviderRegistry;
pub use transform::{compose_prompt, GrammarChecker, GrammarMatch, TextTransform};

// Re-export provider types
pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use gemini::{GeminiConfig, GeminiProvider};
pub use languagetool::{LanguageToolChecker, LanguageToolConfig};
pub use local::RuleBasedProvider;
pub use openai::{OpenAiConfig, OpenAiProvider};

//! Fallback chain executor
//!
//! Providers are tried strictly in order; the first success wins. Failures
//! are logged and skipped. When every provider fails the input is echoed back
//! under the [`NO_PROVIDER`] label, so callers never see a provider error.

use crate::transform::TextTransform;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Label reported when no provider produced the output
pub const NO_PROVIDER: &str = "none";

/// Result of running a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainOutput {
    /// Transformed text, or the unmodified input when nothing served
    pub text: String,
    /// Name of the provider that served the request
    pub provider: String,
}

impl ChainOutput {
    fn echo(text: &str) -> Self {
        Self {
            text: text.to_string(),
            provider: NO_PROVIDER.to_string(),
        }
    }

    /// Whether a real provider produced this output
    #[must_use]
    pub fn served(&self) -> bool {
        self.provider != NO_PROVIDER
    }
}

/// An ordered list of providers, most capable first
#[derive(Clone, Default)]
pub struct FallbackChain {
    providers: Vec<Arc<dyn TextTransform>>,
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("providers", &self.names())
            .finish()
    }
}

impl FallbackChain {
    /// Create a chain from providers in priority order
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn TextTransform>>) -> Self {
        Self { providers }
    }

    /// Append a provider at the lowest priority
    #[must_use]
    pub fn with(mut self, provider: Arc<dyn TextTransform>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Provider names in priority order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Number of providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the chain has no providers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Run the chain
    #[instrument(skip(self, text, instruction), fields(chain = ?self.names()))]
    pub async fn run(&self, text: &str, instruction: &str) -> ChainOutput {
        for provider in &self.providers {
            match provider.transform(text, instruction).await {
                Ok(output) => {
                    debug!(provider = provider.name(), "Provider served request");
                    return ChainOutput {
                        text: output,
                        provider: provider.name().to_string(),
                    };
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        kind = ?e.kind(),
                        error = %e,
                        "Provider failed, trying next in chain"
                    );
                }
            }
        }

        warn!("No provider available, echoing input");
        ChainOutput::echo(text)
    }
}

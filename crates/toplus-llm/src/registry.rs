//! Provider registry
//!
//! Holds every provider that could be configured at startup and turns
//! named provider lists from configuration into [`FallbackChain`]s.
//! A name with no registered provider (missing credential) is simply left
//! out of the chain, which is indistinguishable from a provider that fails.

use crate::chain::FallbackChain;
use crate::transform::{GrammarChecker, TextTransform};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of named providers
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn TextTransform>>,
    grammar_checker: Option<Arc<dyn GrammarChecker>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name
    pub fn register(&mut self, provider: Arc<dyn TextTransform>) {
        let name = provider.name().to_string();
        debug!(provider = %name, "Registering text-transform provider");
        self.providers.insert(name, provider);
    }

    /// Set the grammar checker
    pub fn set_grammar_checker(&mut self, checker: Arc<dyn GrammarChecker>) {
        self.grammar_checker = Some(checker);
    }

    /// Get a provider by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn TextTransform>> {
        self.providers.get(name).cloned()
    }

    /// The grammar checker, if configured
    #[must_use]
    pub fn grammar_checker(&self) -> Option<Arc<dyn GrammarChecker>> {
        self.grammar_checker.clone()
    }

    /// Check if a provider is registered
    #[must_use]
    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider names, sorted
    #[must_use]
    pub fn list_providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a chain from provider names in priority order
    #[must_use]
    pub fn chain<S: AsRef<str>>(&self, names: &[S]) -> FallbackChain {
        let providers = names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let provider = self.get(name);
                if provider.is_none() {
                    debug!(provider = name, "Provider not registered, left out of chain");
                }
                provider
            })
            .collect();
        FallbackChain::new(providers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedProvider;

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.list_providers().is_empty());
        assert!(registry.grammar_checker().is_none());
        assert!(!registry.has_provider("gemini"));
    }

    #[test]
    fn test_chain_skips_unregistered_names() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(ScriptedProvider::new("gemini")));
        registry.register(Arc::new(ScriptedProvider::new("openai")));

        let chain = registry.chain(&["anthropic", "gemini", "openai"]);
        assert_eq!(chain.names(), vec!["gemini", "openai"]);
        assert_eq!(registry.list_providers(), vec!["gemini", "openai"]);
    }

    #[test]
    fn test_chain_keeps_configured_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(ScriptedProvider::new("gemini")));
        registry.register(Arc::new(ScriptedProvider::new("anthropic")));

        let names = vec!["gemini".to_string(), "anthropic".to_string()];
        assert_eq!(registry.chain(&names).names(), vec!["gemini", "anthropic"]);
    }
}

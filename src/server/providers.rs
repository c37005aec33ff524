//! Provider resolution
//!
//! Registers every provider whose credential is present in the environment.
//! A provider that is disabled or missing its credential is simply absent
//! from the registry, and chains naming it skip it.

use super::config::{LlmConfig, ProviderSettings};
use std::sync::Arc;
use toplus_llm::{
    AnthropicConfig, AnthropicProvider, GeminiConfig, GeminiProvider, LanguageToolChecker,
    LanguageToolConfig, OpenAiConfig, OpenAiProvider, ProviderRegistry,
};
use tracing::{debug, info, warn};

type Register = fn(&mut ProviderRegistry, &ProviderSettings) -> toplus_llm::Result<()>;

fn register_anthropic(
    registry: &mut ProviderRegistry,
    settings: &ProviderSettings,
) -> toplus_llm::Result<()> {
    let mut config = AnthropicConfig::from_env()?;
    if let Some(model) = &settings.model {
        config = config.with_model(model);
    }
    if let Some(url) = &settings.base_url {
        config = config.with_base_url(url);
    }
    if let Some(timeout) = settings.timeout() {
        config = config.with_timeout(timeout);
    }
    registry.register(Arc::new(AnthropicProvider::new(config)?));
    Ok(())
}

fn register_gemini(
    registry: &mut ProviderRegistry,
    settings: &ProviderSettings,
) -> toplus_llm::Result<()> {
    let mut config = GeminiConfig::from_env()?;
    if let Some(model) = &settings.model {
        config = config.with_model(model);
    }
    if let Some(url) = &settings.base_url {
        config = config.with_base_url(url);
    }
    if let Some(timeout) = settings.timeout() {
        config = config.with_timeout(timeout);
    }
    registry.register(Arc::new(GeminiProvider::new(config)?));
    Ok(())
}

fn register_openai(
    registry: &mut ProviderRegistry,
    settings: &ProviderSettings,
) -> toplus_llm::Result<()> {
    let mut config = OpenAiConfig::from_env()?;
    if let Some(model) = &settings.model {
        config = config.with_model(model);
    }
    if let Some(url) = &settings.base_url {
        config = config.with_base_url(url);
    }
    if let Some(timeout) = settings.timeout() {
        config = config.with_timeout(timeout);
    }
    registry.register(Arc::new(OpenAiProvider::new(config)?));
    Ok(())
}

fn register_languagetool(
    registry: &mut ProviderRegistry,
    settings: &ProviderSettings,
) -> toplus_llm::Result<()> {
    let mut config = LanguageToolConfig::from_env();
    if let Some(url) = &settings.base_url {
        config = config.with_base_url(url);
    }
    if let Some(timeout) = settings.timeout() {
        config = config.with_timeout(timeout);
    }
    registry.set_grammar_checker(Arc::new(LanguageToolChecker::new(config)?));
    Ok(())
}

/// Build the provider registry from configuration and environment
pub fn resolve_providers(llm: &LlmConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    let generative: [(&str, &ProviderSettings, Register); 3] = [
        ("anthropic", &llm.anthropic, register_anthropic),
        ("gemini", &llm.gemini, register_gemini),
        ("openai", &llm.openai, register_openai),
    ];

    for (name, settings, register) in generative {
        if !settings.enabled {
            debug!(provider = name, "Provider disabled in configuration");
            continue;
        }
        match register(&mut registry, settings) {
            Ok(()) => info!(provider = name, "Registered provider"),
            Err(e) => debug!(provider = name, "Provider not available: {}", e),
        }
    }

    if llm.languagetool.enabled {
        match register_languagetool(&mut registry, &llm.languagetool) {
            Ok(()) => info!("Registered LanguageTool grammar checker"),
            Err(e) => warn!("LanguageTool checker init failed: {}", e),
        }
    }

    if registry.list_providers().is_empty() {
        warn!(
            "No generative provider configured. Set ANTHROPIC_API_KEY, GEMINI_API_KEY \
             or OPENAI_API_KEY; until then every step echoes its input"
        );
    }

    registry
}

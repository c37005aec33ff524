//! Review service
//!
//! The entry point used by the HTTP API and the CLI. Builds every engine
//! once from the provider registry and configuration, validates requests,
//! and delegates. Validation errors are the only errors it returns.

use crate::config::ReviewConfig;
use crate::diagnosis::DiagnosisEngine;
use crate::error::{Error, Result};
use crate::grammar::GrammarCorrector;
use crate::recycling::RecyclingCheck;
use crate::stages::{Stage, StageChains, StagePipeline, StageResult};
use crate::types::{DiagnosisResult, RecyclingResult, ScenarioCase, TextType, WorkflowReport};
use crate::workflow::WorkflowEngine;
use std::sync::Arc;
use toplus_llm::{ProviderRegistry, RuleBasedProvider};
use tracing::info;

/// Label reported when the grammar checker served a correction
pub const GRAMMAR_CHECKER_LABEL: &str = "languagetool";

/// Review operations behind request validation
#[derive(Debug, Clone)]
pub struct ReviewService {
    config: Arc<ReviewConfig>,
    diagnosis: DiagnosisEngine,
    workflow: WorkflowEngine,
    recycling: RecyclingCheck,
    stages: StagePipeline,
}

impl ReviewService {
    /// Build the engines from registered providers and configured chains
    #[must_use]
    pub fn from_registry(registry: &ProviderRegistry, config: ReviewConfig) -> Self {
        let chains = &config.chains;
        let generative = registry.chain(&chains.generative);
        let grammar = GrammarCorrector::new(
            registry.grammar_checker(),
            GRAMMAR_CHECKER_LABEL,
            registry.chain(&chains.grammar_fallback),
        );

        let mut stage_chains = StageChains {
            simplify: registry.chain(&chains.stages.simplify),
            grammar: registry.chain(&chains.stages.grammar),
            tone: registry.chain(&chains.stages.tone),
            style: registry.chain(&chains.stages.style),
            sensitivity: registry.chain(&chains.stages.sensitivity),
            final_review: registry.chain(&chains.stages.final_review),
        };
        if config.local_rules {
            stage_chains.simplify = stage_chains
                .simplify
                .with(Arc::new(RuleBasedProvider::simplify()));
            stage_chains.grammar = stage_chains
                .grammar
                .with(Arc::new(RuleBasedProvider::spelling()));
        }

        info!(
            generative = ?generative.names(),
            grammar_checker = registry.grammar_checker().is_some(),
            local_rules = config.local_rules,
            "Review service ready"
        );

        Self {
            diagnosis: DiagnosisEngine::new(generative.clone()),
            workflow: WorkflowEngine::new(generative.clone(), grammar.clone()),
            recycling: RecyclingCheck::new(generative),
            stages: StagePipeline::new(stage_chains, &grammar),
            config: Arc::new(config),
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    fn validate(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        let actual = text.chars().count();
        if actual > self.config.max_text_chars {
            return Err(Error::TextTooLong {
                actual,
                max: self.config.max_text_chars,
            });
        }
        Ok(())
    }

    /// Diagnose `text`
    ///
    /// # Errors
    ///
    /// Validation errors only.
    pub async fn diagnose(
        &self,
        text: &str,
        text_type: Option<TextType>,
        target_grade: Option<&str>,
    ) -> Result<DiagnosisResult> {
        self.validate(text)?;
        let target_grade = target_grade.map(str::trim).filter(|g| !g.is_empty());
        Ok(self.diagnosis.diagnose(text, text_type, target_grade).await)
    }

    /// Run the generic five-step pipeline
    ///
    /// # Errors
    ///
    /// Validation errors only.
    pub async fn run_workflow(
        &self,
        text: &str,
        text_type: Option<TextType>,
    ) -> Result<WorkflowReport> {
        self.validate(text)?;
        Ok(self
            .workflow
            .run_workflow(text, text_type.unwrap_or_default())
            .await)
    }

    /// Run the pipeline for `case`
    ///
    /// # Errors
    ///
    /// Validation errors only.
    pub async fn run_case_workflow(&self, text: &str, case: ScenarioCase) -> Result<WorkflowReport> {
        self.validate(text)?;
        Ok(self.workflow.run_case_workflow(text, case).await)
    }

    /// Check grade appropriateness against `target_grade` (or the configured default)
    ///
    /// # Errors
    ///
    /// Validation errors only.
    pub async fn recycling_check(
        &self,
        text: &str,
        target_grade: Option<&str>,
    ) -> Result<RecyclingResult> {
        self.validate(text)?;
        let target_grade = target_grade
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(&self.config.default_target_grade);
        Ok(self.recycling.check(text, target_grade).await)
    }

    /// Run one passthrough stage
    ///
    /// # Errors
    ///
    /// Validation errors, including a step outside 1..=6.
    pub async fn process_stage(&self, text: &str, step: u8) -> Result<StageResult> {
        let stage = Stage::try_from(step)?;
        self.validate(text)?;
        Ok(self.stages.process(text, stage).await)
    }
}

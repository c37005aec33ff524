//! Six-stage passthrough
//!
//! Single-stage edits for interactive use: the caller picks a stage and gets
//! one transformed text back. Each stage has its own provider chain.

use crate::error::Error;
use crate::grammar::GrammarCorrector;
use crate::prompts;
use crate::types::Edit;
use serde::{Deserialize, Serialize};
use toplus_llm::FallbackChain;
use tracing::instrument;

/// Passthrough stage, numbered 1 to 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// 1. Sentence simplification
    Simplify,
    /// 2. Grammar correction
    Grammar,
    /// 3. Tone adjustment
    Tone,
    /// 4. Style correction
    Style,
    /// 5. Sensitivity check
    Sensitivity,
    /// 6. Final review
    FinalReview,
}

impl Stage {
    /// All stages in order
    pub const ALL: [Stage; 6] = [
        Self::Simplify,
        Self::Grammar,
        Self::Tone,
        Self::Style,
        Self::Sensitivity,
        Self::FinalReview,
    ];

    /// Stage number, 1-based
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Self::Simplify => 1,
            Self::Grammar => 2,
            Self::Tone => 3,
            Self::Style => 4,
            Self::Sensitivity => 5,
            Self::FinalReview => 6,
        }
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simplify => "Sentence simplification",
            Self::Grammar => "Grammar correction",
            Self::Tone => "Tone adjustment",
            Self::Style => "Style correction",
            Self::Sensitivity => "Sensitivity check",
            Self::FinalReview => "Final review",
        }
    }

    /// Instruction sent to the stage chain
    #[must_use]
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Simplify => prompts::STAGE_SIMPLIFY,
            Self::Grammar => prompts::STAGE_GRAMMAR,
            Self::Tone => prompts::STAGE_TONE,
            Self::Style => prompts::STAGE_STYLE,
            Self::Sensitivity => prompts::STAGE_SENSITIVITY,
            Self::FinalReview => prompts::STAGE_FINAL_REVIEW,
        }
    }
}

impl TryFrom<u8> for Stage {
    type Error = Error;

    fn try_from(step: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.number() == step)
            .ok_or(Error::InvalidStage(step))
    }
}

/// Output of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// Transformed text
    pub result: String,
    /// Stage number
    pub step: u8,
    /// Stage label and the provider that served it
    pub message: String,
    /// Positional edits (grammar stage only)
    #[serde(default)]
    pub changes: Vec<Edit>,
}

/// Per-stage chains
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct StageChains {
    pub simplify: FallbackChain,
    pub grammar: FallbackChain,
    pub tone: FallbackChain,
    pub style: FallbackChain,
    pub sensitivity: FallbackChain,
    pub final_review: FallbackChain,
}

impl StageChains {
    fn get(&self, stage: Stage) -> &FallbackChain {
        match stage {
            Stage::Simplify => &self.simplify,
            Stage::Grammar => &self.grammar,
            Stage::Tone => &self.tone,
            Stage::Style => &self.style,
            Stage::Sensitivity => &self.sensitivity,
            Stage::FinalReview => &self.final_review,
        }
    }
}

/// Runs single stages
#[derive(Debug, Clone)]
pub struct StagePipeline {
    chains: StageChains,
    grammar: GrammarCorrector,
}

impl StagePipeline {
    /// Create a pipeline; the grammar stage uses `grammar` with the grammar stage chain as fallback
    #[must_use]
    pub fn new(chains: StageChains, grammar: &GrammarCorrector) -> Self {
        let grammar = grammar.with_fallback(chains.grammar.clone());
        Self { chains, grammar }
    }

    /// Run one stage
    #[instrument(skip(self, text, stage), fields(stage = stage.number()))]
    pub async fn process(&self, text: &str, stage: Stage) -> StageResult {
        let (result, tool, changes) = match stage {
            Stage::Grammar => {
                let outcome = self
                    .grammar
                    .correct_or_fallback(text, stage.instruction())
                    .await;
                (
                    outcome.correction.text,
                    outcome.tool_used,
                    outcome.correction.changes,
                )
            }
            _ => {
                let output = self.chains.get(stage).run(text, stage.instruction()).await;
                (output.text, output.provider, Vec::new())
            }
        };

        StageResult {
            result,
            step: stage.number(),
            message: format!("{} ({tool})", stage.label()),
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use toplus_llm::{
        FailureKind, GrammarChecker, GrammarMatch, RuleBasedProvider, ScriptedProvider,
        TextTransform,
    };

    struct FixedChecker(Vec<GrammarMatch>);

    #[async_trait::async_trait]
    impl GrammarChecker for FixedChecker {
        async fn check(&self, _text: &str, _language: &str) -> toplus_llm::Result<Vec<GrammarMatch>> {
            Ok(self.0.clone())
        }
    }

    fn chain(provider: Arc<dyn TextTransform>) -> FallbackChain {
        FallbackChain::new(vec![provider])
    }

    #[test]
    fn test_stage_numbers() {
        assert_eq!(Stage::try_from(1).unwrap(), Stage::Simplify);
        assert_eq!(Stage::try_from(6).unwrap(), Stage::FinalReview);
        assert!(matches!(Stage::try_from(0), Err(Error::InvalidStage(0))));
        assert!(matches!(Stage::try_from(7), Err(Error::InvalidStage(7))));
        for stage in Stage::ALL {
            assert_eq!(Stage::try_from(stage.number()).unwrap(), stage);
        }
    }

    #[tokio::test]
    async fn test_stage_uses_its_own_chain() {
        let tone = Arc::new(ScriptedProvider::replying("gemini", "Hopeful text!"));
        let simplify = Arc::new(ScriptedProvider::replying("openai", "Short."));
        let chains = StageChains {
            simplify: chain(simplify.clone()),
            tone: chain(tone.clone()),
            ..StageChains::default()
        };
        let pipeline = StagePipeline::new(
            chains,
            &GrammarCorrector::new(None, "languagetool", FallbackChain::default()),
        );

        let result = pipeline.process("Gloomy text.", Stage::Tone).await;
        assert_eq!(result.result, "Hopeful text!");
        assert_eq!(result.step, 3);
        assert_eq!(result.message, "Tone adjustment (gemini)");
        assert_eq!(tone.instructions(), vec![prompts::STAGE_TONE]);
        assert_eq!(simplify.calls(), 0);
    }

    #[tokio::test]
    async fn test_grammar_stage_prefers_checker() {
        let checker: Arc<dyn GrammarChecker> =
            Arc::new(FixedChecker(vec![GrammarMatch::new(2, 3, "have")]));
        let fallback = Arc::new(ScriptedProvider::replying("gemini", "unused"));
        let chains = StageChains {
            grammar: chain(fallback.clone()),
            ..StageChains::default()
        };
        let pipeline = StagePipeline::new(
            chains,
            &GrammarCorrector::new(Some(checker), "languagetool", FallbackChain::default()),
        );

        let result = pipeline.process("I has a pen", Stage::Grammar).await;
        assert_eq!(result.result, "I have a pen");
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.message, "Grammar correction (languagetool)");
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_grammar_stage_local_rules_last() {
        let failing: Arc<dyn TextTransform> =
            Arc::new(ScriptedProvider::failing("gemini", FailureKind::Unavailable));
        let chains = StageChains {
            grammar: chain(failing).with(Arc::new(RuleBasedProvider::spelling())),
            ..StageChains::default()
        };
        let pipeline = StagePipeline::new(
            chains,
            &GrammarCorrector::new(None, "languagetool", FallbackChain::default()),
        );

        let result = pipeline.process("그러면 되요", Stage::Grammar).await;
        assert_eq!(result.result, "그러면 돼요");
        assert_eq!(result.message, "Grammar correction (local-spelling)");
    }

    #[tokio::test]
    async fn test_empty_stage_chain_echoes() {
        let pipeline = StagePipeline::new(
            StageChains::default(),
            &GrammarCorrector::new(None, "languagetool", FallbackChain::default()),
        );
        let result = pipeline.process("as is", Stage::Sensitivity).await;
        assert_eq!(result.result, "as is");
        assert_eq!(result.message, "Sensitivity check (none)");
        assert!(result.changes.is_empty());
    }
}

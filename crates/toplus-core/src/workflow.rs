//! Workflow engine
//!
//! A run is a fixed, linear plan of steps chosen by scenario case. Each step
//! consumes the previous step's output and produces exactly one
//! [`ReviewResult`]; nothing is retried, skipped or revisited.

use crate::checklist;
use crate::grammar::GrammarCorrector;
use crate::parse::{comma_list, grade_level, labeled_section};
use crate::prompts;
use crate::types::{ReviewResult, ScenarioCase, TextType, WorkflowReport};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use toplus_llm::FallbackChain;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Grade reported when the readability output carries none
pub const DEFAULT_GRADE: u32 = 6;

/// Note attached to steps whose output must be checked by a person
pub const NATIVE_REVIEW_NOTE: &str = "⚠️ Recommend native speaker review";

/// Label for the manual review that follows a flagged run
pub const MANUAL_REVIEW_LABEL: &str = "Native speaker review";

// ============================================================================
// Step plan
// ============================================================================

/// Paraphrase flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParaphraseMode {
    /// Clear, formal written style
    Standard,
    /// Shorten by 30-50%
    Simple,
    /// Lively and casual
    CasualLively,
    /// Keep required vocabulary unchanged
    FreezeVocabulary,
}

impl ParaphraseMode {
    /// Instruction for this mode
    #[must_use]
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Standard => prompts::PARAPHRASE_STANDARD,
            Self::Simple => prompts::PARAPHRASE_SIMPLE,
            Self::CasualLively => prompts::TONE_CASUAL_LIVELY,
            Self::FreezeVocabulary => prompts::PARAPHRASE_FREEZE_VOCABULARY,
        }
    }
}

/// What a step does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Grammar checker, generative fallback
    GrammarCorrection,
    /// Grade estimate and simplification
    Readability,
    /// Rewrite in a given mode
    Paraphrase(ParaphraseMode),
    /// Style consistency, flow and sensitivity pass
    DeepStyle,
    /// 13-point checklist and final text
    Checklist,
}

/// One planned step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    /// Step label
    pub name: &'static str,
    /// What the step does
    pub kind: StepKind,
    /// Whether the step output needs a person to check it
    pub needs_human_review: bool,
}

impl PlannedStep {
    const fn new(name: &'static str, kind: StepKind) -> Self {
        Self {
            name,
            kind,
            needs_human_review: false,
        }
    }

    const fn flagged(mut self) -> Self {
        self.needs_human_review = true;
        self
    }
}

/// The generic five-step plan
#[must_use]
pub fn generic_plan(text_type: TextType) -> Vec<PlannedStep> {
    let paraphrase = match text_type {
        TextType::Formal => PlannedStep::new(
            "Context and sentence review",
            StepKind::Paraphrase(ParaphraseMode::Standard),
        ),
        TextType::Casual => PlannedStep::new(
            "Context and sentence review",
            StepKind::Paraphrase(ParaphraseMode::CasualLively),
        ),
    };

    vec![
        PlannedStep::new("Error removal", StepKind::GrammarCorrection),
        PlannedStep::new("Leveling diagnosis", StepKind::Readability),
        paraphrase,
        PlannedStep::new("Style unification", StepKind::DeepStyle),
        PlannedStep::new("13-point review", StepKind::Checklist),
    ]
}

/// Plan for a scenario case
#[must_use]
pub fn plan_for(case: ScenarioCase, text_type: TextType) -> Vec<PlannedStep> {
    match case {
        ScenarioCase::TooDifficult => vec![
            PlannedStep::new("Leveling diagnosis", StepKind::Readability),
            PlannedStep::new(
                "Simplification",
                StepKind::Paraphrase(ParaphraseMode::Simple),
            ),
        ],
        ScenarioCase::TooFormal => vec![
            PlannedStep::new(
                "Tone adjustment",
                StepKind::Paraphrase(ParaphraseMode::CasualLively),
            ),
            PlannedStep::new("Grammar check", StepKind::GrammarCorrection),
        ],
        ScenarioCase::ContextAwkward => vec![
            PlannedStep::new(
                "Sentence restructuring",
                StepKind::Paraphrase(ParaphraseMode::FreezeVocabulary),
            ),
            PlannedStep::new("Style unification", StepKind::DeepStyle),
        ],
        ScenarioCase::MechanicalError => vec![PlannedStep::new(
            "Mechanical error fix",
            StepKind::GrammarCorrection,
        )
        .flagged()],
        ScenarioCase::Normal => generic_plan(text_type),
    }
}

/// Step labels a diagnosis recommends for `case`
#[must_use]
pub fn recommended_workflow(case: ScenarioCase, text_type: TextType) -> Vec<String> {
    let plan = plan_for(case, text_type);
    let flagged = plan.iter().any(|step| step.needs_human_review);
    let mut labels: Vec<String> = plan.iter().map(|step| step.name.to_string()).collect();
    if flagged {
        labels.push(MANUAL_REVIEW_LABEL.to_string());
    }
    labels
}

// ============================================================================
// Engine
// ============================================================================

/// Output of one executed step before it is numbered
struct StepOutput {
    tool_used: String,
    text: String,
    changes: Vec<crate::types::Edit>,
    score: Option<u32>,
    notes: String,
    checklist: Option<checklist::ChecklistReport>,
}

impl StepOutput {
    fn plain(tool_used: String, text: String) -> Self {
        Self {
            tool_used,
            text,
            changes: Vec::new(),
            score: None,
            notes: String::new(),
            checklist: None,
        }
    }
}

/// Runs step plans against a generative chain and a grammar corrector
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    chain: FallbackChain,
    grammar: GrammarCorrector,
}

impl WorkflowEngine {
    /// Create an engine
    #[must_use]
    pub fn new(chain: FallbackChain, grammar: GrammarCorrector) -> Self {
        Self { chain, grammar }
    }

    /// Run the generic five-step pipeline
    pub async fn run_workflow(&self, text: &str, text_type: TextType) -> WorkflowReport {
        self.run_plan(text, None, text_type, &generic_plan(text_type))
            .await
    }

    /// Run the pipeline for `case`
    ///
    /// `Normal` runs the generic pipeline for formal text.
    pub async fn run_case_workflow(&self, text: &str, case: ScenarioCase) -> WorkflowReport {
        let text_type = TextType::default();
        self.run_plan(text, Some(case), text_type, &plan_for(case, text_type))
            .await
    }

    #[instrument(skip(self, text, plan), fields(run_id = tracing::field::Empty))]
    async fn run_plan(
        &self,
        text: &str,
        case: Option<ScenarioCase>,
        text_type: TextType,
        plan: &[PlannedStep],
    ) -> WorkflowReport {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        let started_at = Utc::now();
        info!(?case, %text_type, steps = plan.len(), "Starting workflow");

        let mut current = text.to_string();
        let mut steps = Vec::with_capacity(plan.len());

        for (index, planned) in plan.iter().enumerate() {
            let output = self.execute(planned, &current).await;
            debug!(
                step = index + 1,
                name = planned.name,
                tool = %output.tool_used,
                "Step finished"
            );

            let notes = if planned.needs_human_review {
                if output.notes.is_empty() {
                    NATIVE_REVIEW_NOTE.to_string()
                } else {
                    format!("{} {NATIVE_REVIEW_NOTE}", output.notes)
                }
            } else {
                output.notes
            };

            steps.push(ReviewResult {
                step: index + 1,
                step_name: planned.name.to_string(),
                tool_used: output.tool_used,
                original_text: std::mem::replace(&mut current, output.text.clone()),
                processed_text: output.text,
                changes: output.changes,
                score: output.score,
                notes,
                checklist: output.checklist,
            });
        }

        info!(steps = steps.len(), "Workflow finished");
        WorkflowReport {
            run_id,
            case,
            text_type,
            steps,
            final_text: current,
            human_review_required: plan.iter().any(|s| s.needs_human_review),
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn execute(&self, planned: &PlannedStep, text: &str) -> StepOutput {
        match planned.kind {
            StepKind::GrammarCorrection => {
                let outcome = self.grammar.correct_with_fallback(text).await;
                let notes = if outcome.used_fallback {
                    format!("Grammar checker unavailable, corrected by {}", outcome.tool_used)
                } else {
                    format!(
                        "Found {} grammar issues",
                        outcome.correction.changes.len()
                    )
                };
                StepOutput {
                    notes,
                    changes: outcome.correction.changes,
                    ..StepOutput::plain(outcome.tool_used, outcome.correction.text)
                }
            }
            StepKind::Readability => {
                let output = self.chain.run(text, prompts::READABILITY).await;
                if !output.served() {
                    return StepOutput::plain(output.provider, output.text);
                }
                let grade = grade_level(&output.text).unwrap_or(DEFAULT_GRADE);
                let analysis =
                    labeled_section(&output.text, "NOTES", &["SIMPLIFIED_TEXT"]).unwrap_or_default();
                let simplified = labeled_section(&output.text, "SIMPLIFIED_TEXT", &[])
                    .unwrap_or_else(|| text.to_string());
                StepOutput {
                    score: Some(grade),
                    notes: format!("Grade Level: {grade}. {analysis}").trim_end().to_string(),
                    ..StepOutput::plain(output.provider, simplified)
                }
            }
            StepKind::Paraphrase(mode) => {
                let output = self.chain.run(text, mode.instruction()).await;
                StepOutput::plain(output.provider, output.text)
            }
            StepKind::DeepStyle => {
                let output = self.chain.run(text, prompts::DEEP_STYLE).await;
                if !output.served() {
                    return StepOutput::plain(output.provider, output.text);
                }
                let issues = labeled_section(&output.text, "ISSUES", &["IMPROVED_TEXT"])
                    .map(|section| comma_list(&section))
                    .unwrap_or_default();
                let improved = labeled_section(&output.text, "IMPROVED_TEXT", &[])
                    .unwrap_or_else(|| text.to_string());
                let notes = if issues.is_empty() {
                    "Issues: None".to_string()
                } else {
                    format!("Issues: {}", issues.join(", "))
                };
                StepOutput {
                    notes,
                    ..StepOutput::plain(output.provider, improved)
                }
            }
            StepKind::Checklist => {
                let output = self.chain.run(text, &checklist::instruction()).await;
                if !output.served() {
                    return StepOutput {
                        notes: checklist::CHECKLIST_DEFAULT.to_string(),
                        ..StepOutput::plain(output.provider, output.text)
                    };
                }
                let outcome = checklist::parse_output(&output.text, text);
                StepOutput {
                    notes: outcome.summary,
                    checklist: Some(outcome.report),
                    ..StepOutput::plain(output.provider, outcome.final_text)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;

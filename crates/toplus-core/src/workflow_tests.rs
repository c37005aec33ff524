use super::*;
use std::sync::Arc;
use toplus_llm::{FailureKind, ScriptedProvider, TextTransform, NO_PROVIDER};

fn chain_of(providers: &[Arc<ScriptedProvider>]) -> FallbackChain {
    let providers: Vec<Arc<dyn TextTransform>> = providers
        .iter()
        .map(|p| p.clone() as Arc<dyn TextTransform>)
        .collect();
    FallbackChain::new(providers)
}

fn engine_with(providers: &[Arc<ScriptedProvider>]) -> WorkflowEngine {
    let chain = chain_of(providers);
    WorkflowEngine::new(
        chain.clone(),
        GrammarCorrector::new(None, "languagetool", chain),
    )
}

fn outage_engine() -> WorkflowEngine {
    engine_with(&[
        Arc::new(ScriptedProvider::failing("anthropic", FailureKind::Unavailable)),
        Arc::new(ScriptedProvider::failing("gemini", FailureKind::Timeout)),
    ])
}

#[test]
fn test_step_counts_per_case() {
    let expected = [
        (ScenarioCase::TooDifficult, 2),
        (ScenarioCase::TooFormal, 2),
        (ScenarioCase::ContextAwkward, 2),
        (ScenarioCase::MechanicalError, 1),
        (ScenarioCase::Normal, 5),
    ];
    for (case, count) in expected {
        assert_eq!(plan_for(case, TextType::Formal).len(), count, "{case}");
    }
}

#[test]
fn test_generic_plan_paraphrase_follows_text_type() {
    assert_eq!(
        generic_plan(TextType::Formal)[2].kind,
        StepKind::Paraphrase(ParaphraseMode::Standard)
    );
    assert_eq!(
        generic_plan(TextType::Casual)[2].kind,
        StepKind::Paraphrase(ParaphraseMode::CasualLively)
    );
}

#[test]
fn test_recommended_workflow_labels() {
    assert_eq!(
        recommended_workflow(ScenarioCase::MechanicalError, TextType::Formal),
        vec!["Mechanical error fix", MANUAL_REVIEW_LABEL]
    );
    assert_eq!(
        recommended_workflow(ScenarioCase::TooDifficult, TextType::Formal),
        vec!["Leveling diagnosis", "Simplification"]
    );
    assert_eq!(
        recommended_workflow(ScenarioCase::Normal, TextType::Casual).len(),
        5
    );
}

#[tokio::test]
async fn test_total_outage_echoes_every_case() {
    let engine = outage_engine();
    let text = "The mitochondria is the powerhouse of the cell.";

    for case in ScenarioCase::ALL {
        let report = engine.run_case_workflow(text, case).await;
        assert_eq!(
            report.steps.len(),
            plan_for(case, TextType::Formal).len()
        );
        for step in &report.steps {
            assert_eq!(step.processed_text, step.original_text);
            assert_eq!(step.tool_used, NO_PROVIDER);
        }
        assert_eq!(report.final_text, text);
    }
}

#[tokio::test]
async fn test_total_outage_generic_workflow() {
    let report = outage_engine()
        .run_workflow("unchanged text", TextType::Casual)
        .await;

    assert_eq!(report.steps.len(), 5);
    assert!(report.case.is_none());
    assert_eq!(report.final_text, "unchanged text");
    assert_eq!(report.steps[4].notes, checklist::CHECKLIST_DEFAULT);
    assert!(report.steps[1].score.is_none());
    assert!(!report.human_review_required);
}

#[tokio::test]
async fn test_steps_thread_output_linearly() {
    let provider = Arc::new(
        ScriptedProvider::new("gemini")
            .then_reply("one")
            .then_reply("GRADE_LEVEL: 9\nNOTES: Dense.\nSIMPLIFIED_TEXT: two")
            .then_reply("three")
            .then_reply("ISSUES: repetition, passive voice\nIMPROVED_TEXT: four")
            .then_reply("CHECKLIST:\n1. Grammar: ✅\n2. Spelling: ❌\nFINAL_TEXT: five"),
    );
    let engine = engine_with(&[provider.clone()]);

    let report = engine.run_workflow("zero", TextType::Formal).await;

    let processed: Vec<&str> = report
        .steps
        .iter()
        .map(|s| s.processed_text.as_str())
        .collect();
    assert_eq!(processed, vec!["one", "two", "three", "four", "five"]);
    assert_eq!(report.steps[0].original_text, "zero");
    for pair in report.steps.windows(2) {
        assert_eq!(pair[1].original_text, pair[0].processed_text);
    }
    assert_eq!(report.final_text, "five");
    assert_eq!(provider.calls(), 5);

    let numbers: Vec<usize> = report.steps.iter().map(|s| s.step).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    assert_eq!(report.steps[1].score, Some(9));
    assert_eq!(report.steps[1].notes, "Grade Level: 9. Dense.");
    assert_eq!(report.steps[3].notes, "Issues: repetition, passive voice");
    let checklist = report.steps[4].checklist.as_ref().unwrap();
    assert_eq!(checklist.failed(), vec!["Spelling"]);
}

#[tokio::test]
async fn test_unparsable_readability_uses_defaults() {
    let provider = Arc::new(ScriptedProvider::replying("anthropic", "I cannot grade this."));
    let engine = engine_with(&[provider]);

    let report = engine
        .run_case_workflow("original", ScenarioCase::TooDifficult)
        .await;

    let readability = &report.steps[0];
    assert_eq!(readability.score, Some(DEFAULT_GRADE));
    assert_eq!(readability.processed_text, "original");
    assert_eq!(report.steps[1].original_text, "original");
}

#[tokio::test]
async fn test_casual_paraphrase_instruction() {
    let provider = Arc::new(ScriptedProvider::new("openai"));
    let engine = engine_with(&[provider.clone()]);

    engine
        .run_case_workflow("격식 있는 문장입니다.", ScenarioCase::TooFormal)
        .await;

    let instructions = provider.instructions();
    assert_eq!(instructions[0], prompts::TONE_CASUAL_LIVELY);
    assert_eq!(instructions[1], prompts::GRAMMAR_FALLBACK);
}

#[tokio::test]
async fn test_mechanical_error_flags_review() {
    let provider = Arc::new(ScriptedProvider::replying("gemini", "Fixed text."));
    let engine = engine_with(&[provider]);

    let report = engine
        .run_case_workflow("fixed txt", ScenarioCase::MechanicalError)
        .await;

    assert!(report.human_review_required);
    assert_eq!(report.steps.len(), 1);
    assert!(report.steps[0].notes.ends_with(NATIVE_REVIEW_NOTE));
    assert_eq!(report.final_text, "Fixed text.");
    assert_eq!(report.case, Some(ScenarioCase::MechanicalError));
}

#[tokio::test]
async fn test_fallback_within_step() {
    let first = Arc::new(ScriptedProvider::failing("anthropic", FailureKind::ProviderError));
    let second = Arc::new(ScriptedProvider::replying("gemini", "Restructured."));
    let engine = engine_with(&[first.clone(), second.clone()]);

    let report = engine
        .run_case_workflow("awkward", ScenarioCase::ContextAwkward)
        .await;

    assert_eq!(report.steps[0].tool_used, "gemini");
    assert_eq!(report.steps[0].processed_text, "Restructured.");
    // Deep style reply has no labels, so the step keeps its input
    assert_eq!(report.steps[1].processed_text, "Restructured.");
    assert_eq!(report.steps[1].notes, "Issues: None");
    assert_eq!(first.calls(), 2);
    assert_eq!(second.calls(), 2);
}

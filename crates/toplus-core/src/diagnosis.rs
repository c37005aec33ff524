//! Diagnosis engine
//!
//! Asks a generative provider to classify the text and parses the JSON it
//! returns. Never fails: anything unparsable yields [`DiagnosisResult::default`],
//! and individual missing fields are defaulted one by one.

use crate::error::{Error, Result};
use crate::parse::{extract_json_object, number_field, string_field, string_list_field};
use crate::prompts;
use crate::types::{DiagnosisResult, ScenarioCase, TextType};
use crate::workflow::recommended_workflow;
use toplus_llm::FallbackChain;
use tracing::{debug, instrument, warn};

/// Grade level used when the provider gives none
pub const DEFAULT_GRADE_LEVEL: &str = "M1";

/// Readability used when the provider gives none
pub const DEFAULT_READABILITY: f64 = 50.0;

impl Default for DiagnosisResult {
    fn default() -> Self {
        Self {
            case: ScenarioCase::Normal,
            text_type: TextType::Formal,
            grade_level: DEFAULT_GRADE_LEVEL.to_string(),
            readability_score: DEFAULT_READABILITY,
            issues_found: Vec::new(),
            recommended_workflow: recommended_workflow(ScenarioCase::Normal, TextType::Formal),
        }
    }
}

fn parse_case(label: &str) -> ScenarioCase {
    ScenarioCase::from_diagnosis_label(label)
        .or_else(|| label.parse().ok())
        .unwrap_or(ScenarioCase::Normal)
}

/// Parse provider output into a diagnosis
///
/// # Errors
///
/// [`Error::DiagnosisParse`] when the output holds no JSON object.
pub fn parse_diagnosis(output: &str) -> Result<DiagnosisResult> {
    let map = extract_json_object(output)
        .ok_or_else(|| Error::DiagnosisParse("no JSON object in provider output".into()))?;

    let case = string_field(&map, "case")
        .map(|label| parse_case(&label))
        .unwrap_or(ScenarioCase::Normal);
    let text_type = string_field(&map, "text_type")
        .and_then(|label| label.parse().ok())
        .unwrap_or_default();
    let grade_level =
        string_field(&map, "grade_level").unwrap_or_else(|| DEFAULT_GRADE_LEVEL.to_string());
    let readability_score = number_field(&map, "readability_score")
        .filter(|score| score.is_finite())
        .map_or(DEFAULT_READABILITY, |score| score.clamp(0.0, 100.0));
    let issues_found = string_list_field(&map, "issues")
        .or_else(|| string_list_field(&map, "issues_found"))
        .unwrap_or_default();

    Ok(DiagnosisResult {
        case,
        text_type,
        grade_level,
        readability_score,
        issues_found,
        recommended_workflow: recommended_workflow(case, text_type),
    })
}

/// Classifies text into a scenario case
#[derive(Debug, Clone)]
pub struct DiagnosisEngine {
    chain: FallbackChain,
}

impl DiagnosisEngine {
    /// Create an engine over a generative chain
    #[must_use]
    pub fn new(chain: FallbackChain) -> Self {
        Self { chain }
    }

    /// Diagnose `text`
    ///
    /// A supplied `text_type` overrides the provider's guess; `target_grade`
    /// is passed along in the instruction.
    #[instrument(skip(self, text))]
    pub async fn diagnose(
        &self,
        text: &str,
        text_type: Option<TextType>,
        target_grade: Option<&str>,
    ) -> DiagnosisResult {
        let output = self
            .chain
            .run(text, &prompts::diagnosis(target_grade))
            .await;

        let mut result = if output.served() {
            parse_diagnosis(&output.text).unwrap_or_else(|e| {
                warn!(provider = %output.provider, error = %e, "Using default diagnosis");
                DiagnosisResult::default()
            })
        } else {
            DiagnosisResult::default()
        };

        if let Some(text_type) = text_type {
            result.text_type = text_type;
            result.recommended_workflow = recommended_workflow(result.case, text_type);
        }

        debug!(case = %result.case, grade = %result.grade_level, "Diagnosis complete");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use toplus_llm::{FailureKind, ScriptedProvider, TextTransform};

    fn engine(provider: ScriptedProvider) -> (DiagnosisEngine, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let chain = FallbackChain::new(vec![provider.clone() as Arc<dyn TextTransform>]);
        (DiagnosisEngine::new(chain), provider)
    }

    #[test]
    fn test_parse_full_diagnosis() {
        let output = r#"Here you go:
{
    "grade_level": "H2",
    "readability_score": 35,
    "text_type": "B",
    "issues": ["sentence too long", "difficult vocabulary"],
    "case": "CASE_A"
}"#;
        let result = parse_diagnosis(output).unwrap();
        assert_eq!(result.case, ScenarioCase::TooDifficult);
        assert_eq!(result.text_type, TextType::Casual);
        assert_eq!(result.grade_level, "H2");
        assert_eq!(result.readability_score, 35.0);
        assert_eq!(result.issues_found.len(), 2);
        assert_eq!(
            result.recommended_workflow,
            recommended_workflow(ScenarioCase::TooDifficult, TextType::Casual)
        );
    }

    #[test]
    fn test_missing_fields_defaulted_individually() {
        let result = parse_diagnosis(r#"{"case": "CASE_D", "readability_score": 250}"#).unwrap();
        assert_eq!(result.case, ScenarioCase::MechanicalError);
        assert_eq!(result.text_type, TextType::Formal);
        assert_eq!(result.grade_level, DEFAULT_GRADE_LEVEL);
        assert_eq!(result.readability_score, 100.0);
        assert!(result.issues_found.is_empty());
    }

    #[test]
    fn test_unknown_case_maps_to_normal() {
        let result = parse_diagnosis(r#"{"case": "CASE_Q"}"#).unwrap();
        assert_eq!(result.case, ScenarioCase::Normal);
        assert_eq!(result.recommended_workflow.len(), 5);
    }

    #[test]
    fn test_no_json_is_parse_error() {
        assert!(matches!(
            parse_diagnosis("The text looks fine to me."),
            Err(Error::DiagnosisParse(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_output_gives_default() {
        let (engine, provider) = engine(ScriptedProvider::replying(
            "anthropic",
            "This text is quite hard, maybe CASE_A?",
        ));

        let result = engine.diagnose("어려운 문장", None, None).await;
        assert_eq!(result, DiagnosisResult::default());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_outage_gives_default() {
        let (engine, _) = engine(ScriptedProvider::failing("gemini", FailureKind::Timeout));
        let result = engine.diagnose("text", None, None).await;
        assert_eq!(result.case, ScenarioCase::Normal);
        assert_eq!(result.grade_level, "M1");
        assert_eq!(result.readability_score, 50.0);
    }

    #[tokio::test]
    async fn test_text_type_override_and_target_grade() {
        let (engine, provider) = engine(ScriptedProvider::replying(
            "gemini",
            r#"{"case": "NORMAL", "text_type": "A"}"#,
        ));

        let result = engine
            .diagnose("text", Some(TextType::Casual), Some("E5"))
            .await;
        assert_eq!(result.text_type, TextType::Casual);
        assert_eq!(
            result.recommended_workflow,
            recommended_workflow(ScenarioCase::Normal, TextType::Casual)
        );
        assert!(provider.instructions()[0].ends_with("Target grade: E5"));
    }
}

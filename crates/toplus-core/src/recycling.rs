//! Recycling check
//!
//! Advisory comparison of a text's difficulty against the grade pool it is
//! meant for. Too difficult suggests moving it up a pool, too easy suggests
//! moving it down.

use crate::parse::{bool_field, extract_json_object, string_field};
use crate::prompts;
use crate::types::{grade_rank, Recommendation, RecyclingResult};
use std::cmp::Ordering;
use toplus_llm::FallbackChain;
use tracing::{debug, instrument, warn};

/// Reason given when the provider output could not be used
pub const UNABLE_TO_ANALYZE: &str = "Unable to analyze";

impl RecyclingResult {
    /// Result used when nothing could be analyzed
    #[must_use]
    pub fn unanalyzed(target_grade: &str) -> Self {
        Self {
            current_level: target_grade.to_string(),
            target_level: target_grade.to_string(),
            is_appropriate: true,
            recommendation: Recommendation::Keep,
            reason: UNABLE_TO_ANALYZE.to_string(),
        }
    }
}

/// Recommendation implied by comparing grade labels
fn implied_recommendation(current: &str, target: &str) -> Option<Recommendation> {
    let ordering = grade_rank(current)?.cmp(&grade_rank(target)?);
    Some(match ordering {
        Ordering::Greater => Recommendation::MoveUp,
        Ordering::Less => Recommendation::MoveDown,
        Ordering::Equal => Recommendation::Keep,
    })
}

/// Parse provider output, `None` when it holds no JSON object
#[must_use]
pub fn parse_recycling(output: &str, target_grade: &str) -> Option<RecyclingResult> {
    let map = extract_json_object(output)?;

    let current_level =
        string_field(&map, "current_level").unwrap_or_else(|| target_grade.to_string());

    if current_level.eq_ignore_ascii_case(target_grade) {
        return Some(RecyclingResult {
            current_level,
            target_level: target_grade.to_string(),
            is_appropriate: true,
            recommendation: Recommendation::Keep,
            reason: string_field(&map, "reason").unwrap_or_default(),
        });
    }

    let recommendation = string_field(&map, "recommendation")
        .and_then(|label| Recommendation::from_label(&label))
        .or_else(|| implied_recommendation(&current_level, target_grade))
        .unwrap_or(Recommendation::Keep);
    let is_appropriate = bool_field(&map, "is_appropriate")
        .unwrap_or(recommendation == Recommendation::Keep);

    Some(RecyclingResult {
        current_level,
        target_level: target_grade.to_string(),
        is_appropriate,
        recommendation,
        reason: string_field(&map, "reason").unwrap_or_default(),
    })
}

/// Grade-appropriateness check
#[derive(Debug, Clone)]
pub struct RecyclingCheck {
    chain: FallbackChain,
}

impl RecyclingCheck {
    /// Create a check over a generative chain
    #[must_use]
    pub fn new(chain: FallbackChain) -> Self {
        Self { chain }
    }

    /// Check `text` against `target_grade`
    #[instrument(skip(self, text))]
    pub async fn check(&self, text: &str, target_grade: &str) -> RecyclingResult {
        let output = self
            .chain
            .run(text, &prompts::recycling(target_grade))
            .await;
        if !output.served() {
            return RecyclingResult::unanalyzed(target_grade);
        }

        match parse_recycling(&output.text, target_grade) {
            Some(result) => {
                debug!(
                    current = %result.current_level,
                    recommendation = ?result.recommendation,
                    "Recycling check complete"
                );
                result
            }
            None => {
                warn!(provider = %output.provider, "Recycling output held no JSON object");
                RecyclingResult::unanalyzed(target_grade)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use toplus_llm::{FailureKind, ScriptedProvider, TextTransform};

    fn check_with(provider: ScriptedProvider) -> RecyclingCheck {
        RecyclingCheck::new(FallbackChain::new(vec![
            Arc::new(provider) as Arc<dyn TextTransform>
        ]))
    }

    #[test]
    fn test_matching_level_forces_keep() {
        let output = r#"{"current_level": "m1", "target_level": "M1", "is_appropriate": false, "recommendation": "move_up", "reason": "odd"}"#;
        let result = parse_recycling(output, "M1").unwrap();
        assert_eq!(result.recommendation, Recommendation::Keep);
        assert!(result.is_appropriate);
        assert_eq!(result.reason, "odd");
    }

    #[test]
    fn test_provider_recommendation_used() {
        let output = r#"{"current_level": "H1", "is_appropriate": false, "recommendation": "move_up", "reason": "Abstract vocabulary"}"#;
        let result = parse_recycling(output, "M1").unwrap();
        assert_eq!(result.current_level, "H1");
        assert_eq!(result.target_level, "M1");
        assert_eq!(result.recommendation, Recommendation::MoveUp);
        assert!(!result.is_appropriate);
    }

    #[test]
    fn test_recommendation_implied_from_grades() {
        let result = parse_recycling(r#"{"current_level": "E3"}"#, "M2").unwrap();
        assert_eq!(result.recommendation, Recommendation::MoveDown);
        assert!(!result.is_appropriate);

        let result = parse_recycling(r#"{"current_level": "H3", "recommendation": "?"}"#, "E6").unwrap();
        assert_eq!(result.recommendation, Recommendation::MoveUp);
    }

    #[tokio::test]
    async fn test_unparsable_output() {
        let check = check_with(ScriptedProvider::replying("gemini", "Looks fine."));
        let result = check.check("text", "M3").await;
        assert_eq!(result, RecyclingResult::unanalyzed("M3"));
        assert_eq!(result.reason, UNABLE_TO_ANALYZE);
        assert_eq!(result.current_level, "M3");
    }

    #[test]
    fn test_outage() {
        let check = check_with(ScriptedProvider::failing("gemini", FailureKind::Unavailable));
        let result = tokio_test::block_on(check.check("text", "E2"));
        assert_eq!(result.recommendation, Recommendation::Keep);
        assert!(result.is_appropriate);
    }

    #[tokio::test]
    async fn test_same_grade_end_to_end() {
        let check = check_with(ScriptedProvider::replying(
            "anthropic",
            r#"```json
{"current_level": "E4", "target_level": "E4", "is_appropriate": true, "recommendation": "keep", "reason": "Fits"}
```"#,
        ));
        let result = check.check("짧은 글", "E4").await;
        assert_eq!(result.recommendation, Recommendation::Keep);
        assert_eq!(result.reason, "Fits");
    }
}

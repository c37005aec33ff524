//! Grammar correction
//!
//! Applies positional matches from a [`GrammarChecker`] to the text. Offsets
//! are character indices into the original text; edits are applied in
//! ascending offset order while tracking how far earlier replacements have
//! shifted the remainder.

use crate::error::{Error, Result};
use crate::prompts;
use crate::types::Edit;
use std::sync::Arc;
use toplus_llm::util::contains_hangul;
use toplus_llm::{FallbackChain, GrammarChecker, GrammarMatch};
use tracing::{debug, instrument, warn};

/// Reason recorded when the checker gave no message
pub const DEFAULT_REASON: &str = "Grammar correction";

/// Corrected text with the edits that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Corrected text
    pub text: String,
    /// Applied edits, in application order
    pub changes: Vec<Edit>,
}

/// Correction plus the label of whatever produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOutcome {
    /// Corrected text and edits
    pub correction: Correction,
    /// Checker label, fallback provider name, or the "none" sentinel
    pub tool_used: String,
    /// Whether the generative fallback was used
    pub used_fallback: bool,
}

/// Language code to check `text` in
#[must_use]
pub fn language_for(text: &str) -> &'static str {
    if contains_hangul(text) {
        "ko"
    } else {
        "auto"
    }
}

/// Apply `matches` to `text`
///
/// Matches without a replacement, outside the text, or overlapping an edit
/// already applied are skipped.
#[must_use]
pub fn apply_matches(text: &str, matches: &[GrammarMatch]) -> Correction {
    let mut sorted: Vec<&GrammarMatch> = matches.iter().collect();
    sorted.sort_by_key(|m| m.offset);

    let mut chars: Vec<char> = text.chars().collect();
    let mut changes = Vec::new();
    let mut adjustment: isize = 0;
    // End of the last applied edit, in original coordinates
    let mut applied_until = 0usize;

    for m in sorted {
        let Some(replacement) = m.best_replacement() else {
            continue;
        };
        if m.offset < applied_until {
            debug!(offset = m.offset, "Skipping overlapping grammar match");
            continue;
        }

        let start = isize::try_from(m.offset)
            .ok()
            .and_then(|offset| offset.checked_add(adjustment))
            .and_then(|start| usize::try_from(start).ok());
        let Some((start, end)) =
            start.and_then(|start| Some((start, start.checked_add(m.length)?)))
        else {
            debug!(offset = m.offset, length = m.length, "Skipping out-of-range grammar match");
            continue;
        };
        if end > chars.len() {
            debug!(offset = m.offset, length = m.length, "Skipping out-of-range grammar match");
            continue;
        }

        let original: String = chars[start..end].iter().collect();
        let replacement_chars: Vec<char> = replacement.chars().collect();
        adjustment += replacement_chars.len() as isize - m.length as isize;
        chars.splice(start..end, replacement_chars);
        applied_until = m.offset.saturating_add(m.length);

        changes.push(Edit {
            original,
            corrected: replacement.to_string(),
            reason: if m.message.trim().is_empty() {
                DEFAULT_REASON.to_string()
            } else {
                m.message.clone()
            },
        });
    }

    Correction {
        text: chars.into_iter().collect(),
        changes,
    }
}

/// Grammar correction backed by a checker, with a generative fallback chain
#[derive(Clone)]
pub struct GrammarCorrector {
    checker: Option<Arc<dyn GrammarChecker>>,
    label: String,
    fallback: FallbackChain,
}

impl std::fmt::Debug for GrammarCorrector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarCorrector")
            .field("checker", &self.checker.as_ref().map(|_| &self.label))
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl GrammarCorrector {
    /// Create a corrector
    #[must_use]
    pub fn new(
        checker: Option<Arc<dyn GrammarChecker>>,
        label: impl Into<String>,
        fallback: FallbackChain,
    ) -> Self {
        Self {
            checker,
            label: label.into(),
            fallback,
        }
    }

    /// Label reported when the checker produced the correction
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Same checker, different fallback chain
    #[must_use]
    pub fn with_fallback(&self, fallback: FallbackChain) -> Self {
        Self {
            checker: self.checker.clone(),
            label: self.label.clone(),
            fallback,
        }
    }

    /// Correct `text` with the checker only
    ///
    /// # Errors
    ///
    /// [`Error::GrammarCheckUnavailable`] when no checker is configured or
    /// the checker call fails.
    pub async fn correct(&self, text: &str) -> Result<Correction> {
        let checker = self
            .checker
            .as_ref()
            .ok_or_else(|| Error::GrammarCheckUnavailable("no grammar checker configured".into()))?;

        let matches = checker.check(text, language_for(text)).await?;
        debug!(matches = matches.len(), "Grammar check returned matches");
        Ok(apply_matches(text, &matches))
    }

    /// Correct `text`, falling back to the generative chain
    ///
    /// Never fails; a total outage returns the input unchanged.
    #[instrument(skip(self, text), fields(checker = %self.label))]
    pub async fn correct_or_fallback(&self, text: &str, instruction: &str) -> CorrectionOutcome {
        match self.correct(text).await {
            Ok(correction) => CorrectionOutcome {
                correction,
                tool_used: self.label.clone(),
                used_fallback: false,
            },
            Err(e) => {
                warn!(error = %e, "Grammar checker unavailable, using generative fallback");
                let output = self.fallback.run(text, instruction).await;
                CorrectionOutcome {
                    correction: Correction {
                        text: output.text,
                        changes: Vec::new(),
                    },
                    tool_used: output.provider,
                    used_fallback: true,
                }
            }
        }
    }

    /// [`Self::correct_or_fallback`] with the grammar-checker instruction
    pub async fn correct_with_fallback(&self, text: &str) -> CorrectionOutcome {
        self.correct_or_fallback(text, prompts::GRAMMAR_FALLBACK)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use toplus_llm::{FailureKind, ScriptedProvider, TextTransform, NO_PROVIDER};

    mock! {
        pub Checker {}

        #[async_trait]
        impl GrammarChecker for Checker {
            async fn check(&self, text: &str, language: &str) -> toplus_llm::Result<Vec<GrammarMatch>>;
        }
    }

    fn chain_of(providers: Vec<Arc<ScriptedProvider>>) -> FallbackChain {
        let providers: Vec<Arc<dyn TextTransform>> = providers
            .into_iter()
            .map(|p| p as Arc<dyn TextTransform>)
            .collect();
        FallbackChain::new(providers)
    }

    #[test]
    fn test_offset_adjustment() {
        let matches = vec![GrammarMatch::new(0, 1, "XX"), GrammarMatch::new(3, 1, "Y")];
        let correction = apply_matches("abcdefgh", &matches);

        assert_eq!(correction.text, "XXbcYefgh");
        assert_eq!(correction.changes.len(), 2);
        assert_eq!(correction.changes[1].original, "d");
        assert_eq!(correction.changes[1].corrected, "Y");
        assert_eq!(correction.changes[0].reason, DEFAULT_REASON);
    }

    #[test]
    fn test_unsorted_matches_are_sorted() {
        let matches = vec![
            GrammarMatch::new(8, 3, "sat").with_message("Verb tense"),
            GrammarMatch::new(0, 3, "The"),
        ];
        let correction = apply_matches("teh cat sit", &matches);
        assert_eq!(correction.text, "The cat sat");
        assert_eq!(correction.changes[0].original, "teh");
        assert_eq!(correction.changes[1].reason, "Verb tense");
    }

    #[test]
    fn test_zero_matches_unchanged() {
        let correction = apply_matches("all good", &[]);
        assert_eq!(correction.text, "all good");
        assert!(correction.changes.is_empty());
    }

    #[test]
    fn test_skips_unusable_matches() {
        let mut no_replacement = GrammarMatch::new(0, 1, "x");
        no_replacement.replacements.clear();
        let matches = vec![
            no_replacement,
            GrammarMatch::new(1, 2, "ZZ"),
            GrammarMatch::new(2, 2, "overlap"),
            GrammarMatch::new(10, 5, "past end"),
        ];
        let correction = apply_matches("abcdef", &matches);
        assert_eq!(correction.text, "aZZdef");
        assert_eq!(correction.changes.len(), 1);
    }

    #[test]
    fn test_overflowing_matches_are_skipped() {
        let matches = vec![
            GrammarMatch::new(1, usize::MAX, "huge"),
            GrammarMatch::new(usize::MAX, 2, "far"),
        ];
        let correction = apply_matches("abcdef", &matches);
        assert_eq!(correction.text, "abcdef");
        assert!(correction.changes.is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        // Character offsets, not byte offsets
        let matches = vec![GrammarMatch::new(4, 2, "돼요")];
        let correction = apply_matches("그러면 되요.", &matches);
        assert_eq!(correction.text, "그러면 돼요.");
        assert_eq!(correction.changes[0].original, "되요");
    }

    #[test]
    fn test_language_for() {
        assert_eq!(language_for("안녕하세요"), "ko");
        assert_eq!(language_for("hello"), "auto");
    }

    #[tokio::test]
    async fn test_correct_uses_checker() {
        let mut checker = MockChecker::new();
        checker
            .expect_check()
            .withf(|text, language| text.contains("I has a pen") && language.eq_ignore_ascii_case("auto"))
            .times(1)
            .returning(|_, _| Ok(vec![GrammarMatch::new(2, 3, "have")]));

        let fallback = Arc::new(ScriptedProvider::replying("gemini", "unused"));
        let checker: Arc<dyn GrammarChecker> = Arc::new(checker);
        let corrector =
            GrammarCorrector::new(Some(checker), "languagetool", chain_of(vec![fallback.clone()]));

        let outcome = corrector.correct_with_fallback("I has a pen").await;
        assert_eq!(outcome.correction.text, "I have a pen");
        assert_eq!(outcome.tool_used, "languagetool");
        assert!(!outcome.used_fallback);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_checker_failure_is_unavailable() {
        let mut checker = MockChecker::new();
        checker
            .expect_check()
            .times(1)
            .returning(|_, _| Err(toplus_llm::Error::Timeout(30_000)));

        let fallback = Arc::new(ScriptedProvider::replying("gemini", "unused"));
        let checker: Arc<dyn GrammarChecker> = Arc::new(checker);
        let corrector =
            GrammarCorrector::new(Some(checker), "languagetool", chain_of(vec![fallback.clone()]));

        assert!(matches!(
            corrector.correct("I has a pen").await,
            Err(Error::GrammarCheckUnavailable(_))
        ));
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_checker_failure_falls_back_to_chain() {
        let mut checker = MockChecker::new();
        checker
            .expect_check()
            .times(1)
            .returning(|_, _| Err(toplus_llm::Error::Timeout(30_000)));

        let fallback = Arc::new(ScriptedProvider::replying("gemini", "I have a pen"));
        let checker: Arc<dyn GrammarChecker> = Arc::new(checker);
        let corrector =
            GrammarCorrector::new(Some(checker), "languagetool", chain_of(vec![fallback.clone()]));

        let outcome = corrector.correct_with_fallback("I has a pen").await;
        assert_eq!(outcome.correction.text, "I have a pen");
        assert_eq!(outcome.tool_used, "gemini");
        assert!(outcome.used_fallback);
        assert!(outcome.correction.changes.is_empty());
        assert_eq!(fallback.instructions(), vec![prompts::GRAMMAR_FALLBACK]);
    }

    #[tokio::test]
    async fn test_total_outage_echoes() {
        let failing = Arc::new(ScriptedProvider::failing("gemini", FailureKind::Unavailable));
        let corrector = GrammarCorrector::new(None, "languagetool", chain_of(vec![failing]));

        let outcome = corrector.correct_with_fallback("unchanged").await;
        assert_eq!(outcome.correction.text, "unchanged");
        assert_eq!(outcome.tool_used, NO_PROVIDER);
    }
}

//! 13-point review checklist

use crate::parse::labeled_section;
use serde::{Deserialize, Serialize};

/// Checklist text used when the provider returned no `CHECKLIST` section
pub const CHECKLIST_DEFAULT: &str = "Checklist completed";

/// The thirteen review points, in checklist order
pub const POINTS: [&str; 13] = [
    "Grammar accuracy",
    "Spelling",
    "Punctuation",
    "Sentence structure",
    "Vocabulary appropriateness",
    "Tone consistency",
    "Logical flow",
    "Clarity",
    "Conciseness",
    "Cultural sensitivity",
    "Age appropriateness",
    "Engagement level",
    "Educational value",
];

/// Instruction asking for the checklist and the final text
#[must_use]
pub fn instruction() -> String {
    let points = POINTS
        .iter()
        .enumerate()
        .map(|(i, point)| format!("{}. {point}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Review this text against our 13-point checklist:\n\n{points}\n\n\
         For each point, mark ✅ if pass or ❌ if needs work.\n\
         Then provide the final corrected text.\n\n\
         Output format:\n\
         CHECKLIST:\n\
         1. Grammar: ✅\n\
         2. Spelling: ✅\n\
         ...\n\n\
         FINAL_TEXT: [corrected text]"
    )
}

/// One checklist line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    /// 1-based point number
    pub point: usize,
    /// Point label
    pub label: String,
    /// Pass (✅) or needs work (❌)
    pub passed: bool,
}

/// Parsed checklist section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistReport {
    /// Entries the provider marked
    pub entries: Vec<ChecklistEntry>,
}

impl ChecklistReport {
    /// Parse `N. Label: ✅` lines; unmarked or unnumbered lines are ignored
    #[must_use]
    pub fn parse(section: &str) -> Self {
        let entries = section
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                let (number, rest) = line.split_once('.')?;
                let point: usize = number.trim().parse().ok()?;
                if !(1..=POINTS.len()).contains(&point) {
                    return None;
                }
                let passed = if rest.contains('✅') {
                    true
                } else if rest.contains('❌') {
                    false
                } else {
                    return None;
                };
                let label = rest
                    .split(':')
                    .next()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .unwrap_or(POINTS[point - 1])
                    .to_string();
                Some(ChecklistEntry {
                    point,
                    label,
                    passed,
                })
            })
            .collect();
        Self { entries }
    }

    /// Labels of the points marked as needing work
    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.passed)
            .map(|e| e.label.as_str())
            .collect()
    }
}

/// Outcome of the checklist step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistOutcome {
    /// Raw checklist text (or [`CHECKLIST_DEFAULT`])
    pub summary: String,
    /// Parsed entries
    pub report: ChecklistReport,
    /// Final text (or the input)
    pub final_text: String,
}

/// Split provider output into checklist and final text
#[must_use]
pub fn parse_output(output: &str, input: &str) -> ChecklistOutcome {
    let summary = labeled_section(output, "CHECKLIST", &["FINAL_TEXT"])
        .unwrap_or_else(|| CHECKLIST_DEFAULT.to_string());
    let report = ChecklistReport::parse(&summary);
    let final_text =
        labeled_section(output, "FINAL_TEXT", &[]).unwrap_or_else(|| input.to_string());
    ChecklistOutcome {
        summary,
        report,
        final_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_lists_all_points() {
        let text = instruction();
        assert!(text.contains("1. Grammar accuracy"));
        assert!(text.contains("13. Educational value"));
        assert!(text.contains("FINAL_TEXT:"));
    }

    #[test]
    fn test_parse_output() {
        let output = "CHECKLIST:\n1. Grammar: ✅\n2. Spelling: ❌\n7. Logical flow: ✅\nnot a point\n\nFINAL_TEXT: The dog ran home.";
        let outcome = parse_output(output, "the dog run home");

        assert_eq!(outcome.final_text, "The dog ran home.");
        assert_eq!(outcome.report.entries.len(), 3);
        assert_eq!(outcome.report.failed(), vec!["Spelling"]);
        assert!(outcome.summary.starts_with("1. Grammar"));
    }

    #[test]
    fn test_parse_output_defaults() {
        let outcome = parse_output("I could not follow the format.", "original");
        assert_eq!(outcome.summary, CHECKLIST_DEFAULT);
        assert_eq!(outcome.final_text, "original");
        assert!(outcome.report.entries.is_empty());
    }

    #[test]
    fn test_out_of_range_points_ignored() {
        let report = ChecklistReport::parse("0. Nothing: ✅\n14. Extra: ❌\n3. : ✅");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].label, "Punctuation");
    }
}

//! Core review types

use crate::checklist::ChecklistReport;
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Scenario Case
// ============================================================================

/// Diagnosed defect category driving the choice of pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCase {
    /// Too difficult for the target grade
    TooDifficult,
    /// Tone too formal or stiff for casual content
    TooFormal,
    /// Required vocabulary makes the context awkward
    ContextAwkward,
    /// Suspected mechanical errors (grammar, punctuation)
    MechanicalError,
    /// No major issues
    Normal,
}

impl ScenarioCase {
    /// All cases, in diagnosis-label order
    pub const ALL: [ScenarioCase; 5] = [
        Self::TooDifficult,
        Self::TooFormal,
        Self::ContextAwkward,
        Self::MechanicalError,
        Self::Normal,
    ];

    /// Wire label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooDifficult => "too_difficult",
            Self::TooFormal => "too_formal",
            Self::ContextAwkward => "context_awkward",
            Self::MechanicalError => "mechanical_error",
            Self::Normal => "normal",
        }
    }

    /// Map a diagnosis label (`CASE_A`..`CASE_D`, `NORMAL`) to a case
    #[must_use]
    pub fn from_diagnosis_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "CASE_A" | "A" => Some(Self::TooDifficult),
            "CASE_B" | "B" => Some(Self::TooFormal),
            "CASE_C" | "C" => Some(Self::ContextAwkward),
            "CASE_D" | "D" => Some(Self::MechanicalError),
            "NORMAL" => Some(Self::Normal),
            _ => None,
        }
    }
}

impl fmt::Display for ScenarioCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .or_else(|| Self::from_diagnosis_label(s))
            .ok_or_else(|| Error::UnknownCase(s.to_string()))
    }
}

// ============================================================================
// Text Type
// ============================================================================

/// Register of the passage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    /// Passage A: calm and clear
    #[default]
    Formal,
    /// Passage B: lively and engaging
    Casual,
}

impl TextType {
    /// Wire label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
        }
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formal" | "a" | "type_a" => Ok(Self::Formal),
            "casual" | "b" | "type_b" => Ok(Self::Casual),
            _ => Err(Error::UnknownTextType(s.to_string())),
        }
    }
}

// ============================================================================
// Grade levels
// ============================================================================

/// Ordinal of a school-grade label: E1..E6 → 1..6, M1..M3 → 7..9, H1..H3 → 10..12
#[must_use]
pub fn grade_rank(label: &str) -> Option<u8> {
    let label = label.trim().to_ascii_uppercase();
    let mut chars = label.chars();
    let band = chars.next()?;
    let year: u8 = chars.as_str().parse().ok()?;
    match (band, year) {
        ('E', 1..=6) => Some(year),
        ('M', 1..=3) => Some(6 + year),
        ('H', 1..=3) => Some(9 + year),
        _ => None,
    }
}

// ============================================================================
// Results
// ============================================================================

/// One positional correction applied to the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Replaced substring
    pub original: String,
    /// Replacement
    pub corrected: String,
    /// Explanation
    pub reason: String,
}

/// Output of one pipeline step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    /// 1-based position in the run
    pub step: usize,
    /// Step label
    pub step_name: String,
    /// Provider or service that produced the output
    pub tool_used: String,
    /// Input of this step
    pub original_text: String,
    /// Output of this step
    pub processed_text: String,
    /// Positional edits, if the step produces them
    pub changes: Vec<Edit>,
    /// Grade estimate for readability steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Free-form notes
    pub notes: String,
    /// Parsed checklist for the 13-point review step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<ChecklistReport>,
}

/// Result of a full workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    /// Run identifier (for log correlation)
    pub run_id: Uuid,
    /// Case that selected the pipeline (`None` for the generic run)
    pub case: Option<ScenarioCase>,
    /// Text type used by the paraphrase step
    pub text_type: TextType,
    /// Step results in execution order
    pub steps: Vec<ReviewResult>,
    /// Output of the last step
    pub final_text: String,
    /// Whether a person must review the result before use
    pub human_review_required: bool,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    pub finished_at: DateTime<Utc>,
}

/// Diagnosis of an input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Scenario case
    pub case: ScenarioCase,
    /// Text type
    pub text_type: TextType,
    /// School-grade label such as "M1"
    pub grade_level: String,
    /// Readability, 0 (hard) to 100 (easy)
    pub readability_score: f64,
    /// Problems spotted
    pub issues_found: Vec<String>,
    /// Step labels the case pipeline will run
    pub recommended_workflow: Vec<String>,
}

/// Recycling recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Keep in the current grade pool
    Keep,
    /// Move to a higher grade pool (too difficult)
    MoveUp,
    /// Move to a lower grade pool (too easy)
    MoveDown,
}

impl Recommendation {
    /// Parse a provider label leniently
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "keep" | "keep_current" => Some(Self::Keep),
            "move_up" | "up" => Some(Self::MoveUp),
            "move_down" | "down" => Some(Self::MoveDown),
            _ => None,
        }
    }
}

/// Result of a recycling check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecyclingResult {
    /// Assessed level of the text
    pub current_level: String,
    /// Requested level
    pub target_level: String,
    /// Whether the text fits the target level
    pub is_appropriate: bool,
    /// What to do with the text
    pub recommendation: Recommendation,
    /// Explanation
    pub reason: String,
}

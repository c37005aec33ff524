//! Error types for toplus-core
//!
//! Only the request-shape variants ever leave the crate; the rest are
//! converted into fallback actions by the component that produced them.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Input text is empty or whitespace
    #[error("text cannot be empty")]
    EmptyText,

    /// Input text exceeds the configured limit
    #[error("text too long: {actual} characters (max {max})")]
    TextTooLong {
        /// Characters received
        actual: usize,
        /// Configured maximum
        max: usize,
    },

    /// Stage number outside 1..=6
    #[error("step must be between 1 and 6, got {0}")]
    InvalidStage(u8),

    /// Unrecognized scenario case label
    #[error("unknown scenario case: {0}")]
    UnknownCase(String),

    /// Unrecognized text type label
    #[error("unknown text type: {0}")]
    UnknownTextType(String),

    /// Grammar checker missing or failed
    #[error("grammar check unavailable: {0}")]
    GrammarCheckUnavailable(String),

    /// Structured output from a provider could not be parsed
    #[error("diagnosis parse failure: {0}")]
    DiagnosisParse(String),
}

impl Error {
    /// Whether this is an input-contract violation safe to show the caller
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyText
                | Error::TextTooLong { .. }
                | Error::InvalidStage(_)
                | Error::UnknownCase(_)
                | Error::UnknownTextType(_)
        )
    }
}

impl From<toplus_llm::Error> for Error {
    fn from(e: toplus_llm::Error) -> Self {
        Error::GrammarCheckUnavailable(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for toplus-llm

use std::time::Duration;
use thiserror::Error;

/// Provider error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider not configured (no credential)
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// API error (non-success status)
    #[error("api error: {0}")]
    Api(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimit,

    /// Invalid or empty response payload
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),
}

/// Coarse failure classes a caller can act on.
///
/// Every variant leads to the same fallback action; the distinction
/// only matters for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No credential configured for the provider
    Unavailable,
    /// Bad status, malformed payload or transport failure
    ProviderError,
    /// The call exceeded its timeout
    Timeout,
}

impl Error {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::NotConfigured(_) => FailureKind::Unavailable,
            Error::Timeout(_) => FailureKind::Timeout,
            Error::Api(_) | Error::RateLimit | Error::InvalidResponse(_) | Error::Network(_) => {
                FailureKind::ProviderError
            }
        }
    }

    /// Build an error of the given kind (used by scripted providers)
    #[must_use]
    pub fn of_kind(kind: FailureKind, provider: &str) -> Self {
        match kind {
            FailureKind::Unavailable => Error::NotConfigured(provider.to_string()),
            FailureKind::ProviderError => Error::Api(format!("{provider} returned an error")),
            FailureKind::Timeout => Error::Timeout(0),
        }
    }

    /// Convert a transport error, keeping timeouts distinguishable
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Error::Timeout(timeout.as_millis() as u64)
        } else {
            Error::Network(crate::util::sanitize_api_error(&err.to_string()))
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::NotConfigured("gemini".into()).kind(),
            FailureKind::Unavailable
        );
        assert_eq!(Error::Timeout(30_000).kind(), FailureKind::Timeout);
        assert_eq!(Error::RateLimit.kind(), FailureKind::ProviderError);
        assert_eq!(
            Error::InvalidResponse("no candidates".into()).kind(),
            FailureKind::ProviderError
        );
    }

    #[test]
    fn test_of_kind_round_trips() {
        for kind in [
            FailureKind::Unavailable,
            FailureKind::ProviderError,
            FailureKind::Timeout,
        ] {
            assert_eq!(Error::of_kind(kind, "mock").kind(), kind);
        }
    }
}

//! Common utilities for text-transform providers
//!
//! Shared helpers for key masking, error sanitization and text inspection.

/// Minimum key length to display partial key
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Number of characters to show at start/end of masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Maximum length of an error message kept for logs
const MAX_ERROR_LEN: usize = 300;

/// Mask API key for safe display in logs
///
/// Shows first 4 and last 4 characters for keys longer than 8 characters,
/// otherwise shows "****".
///
/// # Examples
/// ```
/// use toplus_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY || !key.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &key[..KEY_MASK_VISIBLE_CHARS],
        &key[key.len() - KEY_MASK_VISIBLE_CHARS..]
    )
}

/// Sanitize provider error messages so credentials never reach logs or callers
#[must_use]
pub fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("api_key")
        || lower.contains("apikey")
        || lower.contains("key=")
        || lower.contains("x-api-key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("bearer")
    {
        return "API authentication error. Please check your API key configuration.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") || lower.contains("overloaded") {
        return "API rate limit exceeded. Please try again later.".to_string();
    }

    if error.len() > MAX_ERROR_LEN {
        format!("{}...(truncated)", truncate_safe(error, MAX_ERROR_LEN))
    } else {
        error.to_string()
    }
}

/// Truncate a string to at most `max_bytes`, respecting char boundaries
#[must_use]
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Whether the text contains Hangul syllables
#[must_use]
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| ('가'..='힣').contains(&c))
}

/// Read a non-empty environment variable
pub(crate) fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key_long() {
        let masked = mask_api_key("sk-1234567890abcdefghij");
        assert_eq!(masked, "sk-1...ghij");
        assert!(!masked.contains("567890"));
    }

    #[test]
    fn test_mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
    }

    #[test]
    fn test_sanitize_api_error() {
        let sanitized = sanitize_api_error("Invalid x-api-key header");
        assert!(!sanitized.contains("x-api-key"));
        assert!(sanitized.contains("authentication"));

        let sanitized = sanitize_api_error("overloaded: too many requests");
        assert!(sanitized.contains("rate limit"));

        assert_eq!(sanitize_api_error("HTTP 500"), "HTTP 500");
    }

    #[test]
    fn test_sanitize_truncates_long_errors() {
        let long = "x".repeat(1000);
        let sanitized = sanitize_api_error(&long);
        assert!(sanitized.ends_with("...(truncated)"));
        assert!(sanitized.len() < 400);
    }

    #[test]
    fn test_truncate_safe_multibyte() {
        assert_eq!(truncate_safe("가나다", 4), "가");
        assert_eq!(truncate_safe("abc", 10), "abc");
    }

    #[test]
    fn test_contains_hangul() {
        assert!(contains_hangul("Hello 세계"));
        assert!(!contains_hangul("Hello world"));
    }
}

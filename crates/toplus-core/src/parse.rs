//! Lenient parsing of provider output
//!
//! Providers are asked for JSON or labeled sections but answer in free text
//! often enough that every parser here returns `Option` and leaves the
//! default to the caller.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static FLAT_OBJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^{}]*\}").expect("FLAT_OBJECT_REGEX is a compile-time constant")
});

static GRADE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"GRADE_LEVEL:\s*(\d+)").expect("GRADE_REGEX is a compile-time constant")
});

fn as_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Find the first JSON object embedded in `text`
///
/// Tries the outermost `{...}` span first (handles nested objects and code
/// fences), then every flat `{...}` span in order.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Some(map) = as_object(&text[start..=end]) {
                return Some(map);
            }
        }
    }

    FLAT_OBJECT_REGEX
        .find_iter(text)
        .find_map(|m| as_object(m.as_str()))
}

/// Text following `LABEL:` up to the next of `stop_labels` (or the end)
///
/// Returns `None` when the label is absent or its section is blank.
#[must_use]
pub fn labeled_section(text: &str, label: &str, stop_labels: &[&str]) -> Option<String> {
    let marker = format!("{label}:");
    let start = text.find(&marker)? + marker.len();
    let rest = &text[start..];

    let end = stop_labels
        .iter()
        .filter_map(|stop| rest.find(&format!("{stop}:")))
        .min()
        .unwrap_or(rest.len());

    let section = rest[..end].trim();
    (!section.is_empty()).then(|| section.to_string())
}

/// Integer after `GRADE_LEVEL:`
#[must_use]
pub fn grade_level(text: &str) -> Option<u32> {
    GRADE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Comma-separated list, blanks dropped
#[must_use]
pub fn comma_list(section: &str) -> Vec<String> {
    section
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// String field, accepting numbers too
#[must_use]
pub fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric field, accepting numeric strings too
#[must_use]
pub fn number_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean field, accepting "true"/"false" strings too
#[must_use]
pub fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().to_ascii_lowercase().parse().ok(),
        _ => None,
    }
}

/// List of strings; a bare string becomes a comma list
#[must_use]
pub fn string_list_field(map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match map.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) => Some(comma_list(s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_prose() {
        let text = "Sure! Here is the analysis:\n```json\n{\"case\": \"CASE_B\", \"readability_score\": 80}\n```\nHope it helps.";
        let map = extract_json_object(text).unwrap();
        assert_eq!(string_field(&map, "case").as_deref(), Some("CASE_B"));
        assert_eq!(number_field(&map, "readability_score"), Some(80.0));
    }

    #[test]
    fn test_extract_json_falls_back_to_flat_objects() {
        // Outer braces do not form valid JSON; the flat object does.
        let text = "{broken {\"grade_level\": \"E5\"} trailing}";
        let map = extract_json_object(text).unwrap();
        assert_eq!(string_field(&map, "grade_level").as_deref(), Some("E5"));
    }

    #[test]
    fn test_extract_json_none() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("} backwards {").is_none());
        assert!(extract_json_object("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_labeled_sections() {
        let output = "GRADE_LEVEL: 8\nNOTES: Long sentences.\nSIMPLIFIED_TEXT: The cat sat.\nIt was warm.";
        assert_eq!(grade_level(output), Some(8));
        assert_eq!(
            labeled_section(output, "NOTES", &["SIMPLIFIED_TEXT"]).as_deref(),
            Some("Long sentences.")
        );
        assert_eq!(
            labeled_section(output, "SIMPLIFIED_TEXT", &[]).as_deref(),
            Some("The cat sat.\nIt was warm.")
        );
    }

    #[test]
    fn test_labeled_section_missing_or_blank() {
        assert!(labeled_section("nothing labeled", "NOTES", &[]).is_none());
        assert!(labeled_section("NOTES:   \nSIMPLIFIED_TEXT: x", "NOTES", &["SIMPLIFIED_TEXT"]).is_none());
        assert!(grade_level("GRADE_LEVEL: seven").is_none());
    }

    #[test]
    fn test_comma_list() {
        assert_eq!(
            comma_list(" passive voice, , repetition "),
            vec!["passive voice", "repetition"]
        );
        assert!(comma_list("").is_empty());
    }

    #[test]
    fn test_lenient_fields() {
        let map = extract_json_object(
            r#"{"score": "75", "ok": "TRUE", "issues": "long, vague", "level": 3}"#,
        )
        .unwrap();
        assert_eq!(number_field(&map, "score"), Some(75.0));
        assert_eq!(bool_field(&map, "ok"), Some(true));
        assert_eq!(
            string_list_field(&map, "issues"),
            Some(vec!["long".to_string(), "vague".to_string()])
        );
        assert_eq!(string_field(&map, "level").as_deref(), Some("3"));
        assert!(string_field(&map, "missing").is_none());
    }
}

//! Description text cleaning: HTML tag stripping and whitespace
//! normalization. Upstream descriptions arrive as HTML fragments,
//! plain text, or occasionally arrays of strings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Strip HTML tags and collapse runs of whitespace to single spaces.
pub fn clean_text(input: &str) -> String {
    let stripped = HTML_TAG.replace_all(input, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Coerce an arbitrary JSON value to text before cleaning. Arrays are
/// joined element-wise; scalars render as their string form; null and
/// containers without text yield the empty string.
pub fn coerce_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(coerce_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null | JsonValue::Object(_) => String::new(),
    }
}

/// Coerce then clean in one step; never fails.
pub fn clean_value(value: &JsonValue) -> String {
    clean_text(&coerce_text(value))
}

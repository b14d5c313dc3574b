//! Table-driven field extraction.
//!
//! Each upstream API is described by a [`SourceSpec`]: an ordered list
//! of JSON paths per canonical field, tried first-non-empty. One
//! generic walker replaces the per-source copy-paste normalizers;
//! anything a path table cannot express lives in that source's
//! `fixup` hook.
//!
//! Path syntax: dot-separated segments; a segment of digits indexes
//! into an array (`"locations.0.name"`, `"refs.landing_page"`).

use jobgrid_core::{RawJob, DEFAULT_LOCATION, NOT_AVAILABLE};
use serde_json::Value as JsonValue;

use crate::clean;

/// Candidate paths for each of the ten intermediate fields. Empty
/// lists mean the upstream never carries the field and the default
/// applies.
pub struct SourceSpec {
    pub source: &'static str,
    pub company: &'static [&'static str],
    pub title: &'static [&'static str],
    pub location: &'static [&'static str],
    /// Unlike the other fields, all tag paths contribute (sources
    /// split tags across several arrays); elements are joined "; ".
    pub tags: &'static [&'static str],
    pub description: &'static [&'static str],
    pub url: &'static [&'static str],
    pub salary_min: &'static [&'static str],
    pub salary_max: &'static [&'static str],
    pub posted: &'static [&'static str],
    pub id: &'static [&'static str],
}

/// Walk a dot-separated path into a JSON value.
pub fn lookup<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut cur = value;
    for segment in path.split('.') {
        cur = match cur {
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => cur.get(segment)?,
        };
    }
    Some(cur)
}

/// Render a scalar as trimmed text; empty for null/containers.
fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// First path resolving to non-empty text, else the default.
fn first_text(raw: &JsonValue, paths: &[&str], default: &str) -> String {
    for path in paths {
        if let Some(value) = lookup(raw, path) {
            let text = scalar_text(value);
            if !text.is_empty() {
                return text;
            }
        }
    }
    default.to_string()
}

/// Tolerant numeric coercion: JSON numbers pass through; strings are
/// parsed after stripping thousands separators; anything else is None.
pub fn to_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => {
            let cleaned = s.trim().replace(',', "");
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse().ok()
        }
        _ => None,
    }
}

fn first_number(raw: &JsonValue, paths: &[&str]) -> Option<f64> {
    paths
        .iter()
        .filter_map(|path| lookup(raw, path))
        .find_map(to_number)
}

/// Flatten a tags value: strings stay, arrays contribute each element,
/// objects contribute their `name` (or `title`) field.
fn tag_fragments(value: &JsonValue, out: &mut Vec<String>) {
    match value {
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                tag_fragments(item, out);
            }
        }
        JsonValue::Object(map) => {
            if let Some(name) = map.get("name").or_else(|| map.get("title")) {
                tag_fragments(name, out);
            }
        }
        _ => {}
    }
}

fn collect_tags(raw: &JsonValue, paths: &[&str]) -> String {
    let mut fragments = Vec::new();
    for path in paths {
        if let Some(value) = lookup(raw, path) {
            tag_fragments(value, &mut fragments);
        }
    }
    fragments.join("; ")
}

/// Extract the flat intermediate record from one raw upstream value.
/// Never fails; every missing field gets its documented default.
pub fn extract(spec: &SourceSpec, raw: &JsonValue) -> RawJob {
    let description = spec
        .description
        .iter()
        .filter_map(|path| lookup(raw, path))
        .map(clean::clean_value)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let id = first_text(raw, spec.id, "");
    // "N/A" is the original feeds' own placeholder, not a stable id.
    let id = if id == NOT_AVAILABLE { String::new() } else { id };

    RawJob {
        company: first_text(raw, spec.company, NOT_AVAILABLE),
        title: first_text(raw, spec.title, NOT_AVAILABLE),
        location: first_text(raw, spec.location, DEFAULT_LOCATION),
        tags: collect_tags(raw, spec.tags),
        description,
        url: first_text(raw, spec.url, NOT_AVAILABLE),
        salary_min: first_number(raw, spec.salary_min),
        salary_max: first_number(raw, spec.salary_max),
        posted: first_text(raw, spec.posted, ""),
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SPEC: SourceSpec = SourceSpec {
        source: "Test",
        company: &["company.display_name", "company"],
        title: &["title"],
        location: &["location.display_name", "location"],
        tags: &["tags"],
        description: &["description"],
        url: &["redirect_url", "url"],
        salary_min: &["salary_min"],
        salary_max: &["salary_max"],
        posted: &["created"],
        id: &["id"],
    };

    #[test]
    fn nested_display_name_fields_resolve() {
        let raw = json!({
            "company": {"display_name": "Acme"},
            "location": {"display_name": "Remote"},
        });
        let job = extract(&TEST_SPEC, &raw);
        assert_eq!(job.company, "Acme");
        assert_eq!(job.location, "Remote");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let job = extract(&TEST_SPEC, &json!({}));
        assert_eq!(job.company, "N/A");
        assert_eq!(job.title, "N/A");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.tags, "");
        assert_eq!(job.description, "N/A");
        assert_eq!(job.url, "N/A");
        assert_eq!(job.salary_min, None);
        assert_eq!(job.posted, "");
        assert_eq!(job.id, "");
    }

    #[test]
    fn numeric_id_renders_as_text() {
        let job = extract(&TEST_SPEC, &json!({"id": 123456}));
        assert_eq!(job.id, "123456");
    }

    #[test]
    fn placeholder_id_is_treated_as_missing() {
        let job = extract(&TEST_SPEC, &json!({"id": "N/A"}));
        assert_eq!(job.id, "");
    }

    #[test]
    fn salary_strings_with_separators_coerce() {
        let raw = json!({"salary_min": "112,015.0", "salary_max": 145_617});
        let job = extract(&TEST_SPEC, &raw);
        assert_eq!(job.salary_min, Some(112_015.0));
        assert_eq!(job.salary_max, Some(145_617.0));
    }

    #[test]
    fn url_candidates_are_tried_in_order() {
        let raw = json!({"url": "https://fallback", "redirect_url": "https://primary"});
        assert_eq!(extract(&TEST_SPEC, &raw).url, "https://primary");
        let raw = json!({"url": "https://fallback"});
        assert_eq!(extract(&TEST_SPEC, &raw).url, "https://fallback");
    }

    #[test]
    fn array_tags_join_with_semicolons() {
        let raw = json!({"tags": ["python", "remote", "full-time"]});
        assert_eq!(extract(&TEST_SPEC, &raw).tags, "python; remote; full-time");
    }

    #[test]
    fn description_html_is_cleaned_during_extraction() {
        let raw = json!({"description": "<p>Build <b>things</b></p>"});
        assert_eq!(extract(&TEST_SPEC, &raw).description, "Build things");
    }

    #[test]
    fn lookup_indexes_into_arrays() {
        let raw = json!({"locations": [{"name": "New York, NY"}]});
        assert_eq!(
            lookup(&raw, "locations.0.name").and_then(|v| v.as_str()),
            Some("New York, NY")
        );
        assert!(lookup(&raw, "locations.3.name").is_none());
    }
}

//! Salary extraction from free-text strings.
//!
//! Patterns are tried in a fixed priority order; the first match wins
//! and no later pattern is consulted. A `k` suffix anywhere in the
//! matched text multiplies the captured values by 1000. Single-value
//! matches fill both bounds (min == max).

use once_cell::sync::Lazy;
use regex::Regex;

static RANGE_K: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$(\d+)k?\s*-\s*\$(\d+)k?").unwrap());
static RANGE_THOUSANDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(\d{1,3}(?:,\d{3})*)\s*-\s*\$(\d{1,3}(?:,\d{3})*)").unwrap()
});
static SINGLE_K: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\$(\d+)k").unwrap());
static SINGLE_PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(\d+(?:,\d{3})*)").unwrap());

fn capture_to_f64(raw: &str, thousands: bool) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let value: f64 = cleaned.parse().ok()?;
    Some(if thousands { value * 1000.0 } else { value })
}

/// Parse `(min, max)` salary bounds out of free text. Returns
/// `(None, None)` when nothing matches; never fails.
pub fn parse_text(text: &str) -> (Option<f64>, Option<f64>) {
    if text.is_empty() {
        return (None, None);
    }

    if let Some(caps) = RANGE_K.captures(text) {
        let k = caps[0].to_lowercase().contains('k');
        let min = capture_to_f64(&caps[1], k);
        let max = capture_to_f64(&caps[2], k);
        return (min, max);
    }

    if let Some(caps) = RANGE_THOUSANDS.captures(text) {
        let min = capture_to_f64(&caps[1], false);
        let max = capture_to_f64(&caps[2], false);
        return (min, max);
    }

    if let Some(caps) = SINGLE_K.captures(text) {
        let value = capture_to_f64(&caps[1], true);
        return (value, value);
    }

    if let Some(caps) = SINGLE_PLAIN.captures(text) {
        let value = capture_to_f64(&caps[1], false);
        return (value, value);
    }

    (None, None)
}

/// Prefer structured bounds; fall back to text parsing only when both
/// structured values are absent.
pub fn structured_or_text(
    min: Option<f64>,
    max: Option<f64>,
    text: &str,
) -> (Option<f64>, Option<f64>) {
    if min.is_some() || max.is_some() {
        return (min, max);
    }
    parse_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sided_range_with_k_suffix() {
        assert_eq!(parse_text("$70k - $110k"), (Some(70_000.0), Some(110_000.0)));
        assert_eq!(parse_text("Comp: $70k-$110k plus equity"), (Some(70_000.0), Some(110_000.0)));
    }

    #[test]
    fn two_sided_range_without_suffix_is_taken_literally() {
        assert_eq!(parse_text("$70 - $110"), (Some(70.0), Some(110.0)));
    }

    #[test]
    fn range_with_thousands_separators() {
        assert_eq!(
            parse_text("Salary $170,000 - $190,000 per year"),
            (Some(170_000.0), Some(190_000.0))
        );
    }

    #[test]
    fn single_k_value_fills_both_bounds() {
        assert_eq!(parse_text("$180k + bonus up to 100%"), (Some(180_000.0), Some(180_000.0)));
    }

    #[test]
    fn single_plain_value_fills_both_bounds() {
        assert_eq!(parse_text("$85,000"), (Some(85_000.0), Some(85_000.0)));
    }

    #[test]
    fn first_matching_pattern_wins() {
        // A range match must not be shadowed by the trailing single value.
        assert_eq!(
            parse_text("$90k - $120k, reviewed at $130k"),
            (Some(90_000.0), Some(120_000.0))
        );
    }

    #[test]
    fn unparseable_text_yields_no_bounds() {
        assert_eq!(parse_text("competitive salary DOE"), (None, None));
        assert_eq!(parse_text(""), (None, None));
    }

    #[test]
    fn structured_bounds_win_over_text() {
        assert_eq!(
            structured_or_text(Some(95_000.0), Some(125_000.0), "$70k - $80k"),
            (Some(95_000.0), Some(125_000.0))
        );
        assert_eq!(
            structured_or_text(None, None, "$70k - $80k"),
            (Some(70_000.0), Some(80_000.0))
        );
    }
}

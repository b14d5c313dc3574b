//! Posted-date normalization to UTC from the formats the eight feeds
//! actually emit.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use jobgrid_core::NOT_AVAILABLE;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parse a raw date string to a UTC timestamp. Naive values are
/// assumed UTC; date-only values land at midnight. Returns None for
/// empty/"N/A"/unparseable input — never an error.
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let s = value.trim();
    if s.is_empty() || s == NOT_AVAILABLE {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }

    None
}

//! Core domain model for JobGrid: the canonical job posting schema and
//! the flat intermediate record every source extractor produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CRATE_NAME: &str = "jobgrid-core";

/// Default placeholder for missing upstream text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Default location when upstream gives none (or "N/A").
pub const DEFAULT_LOCATION: &str = "Remote";

/// Flat ten-field record produced by every source extractor.
///
/// Extraction never fails: text fields fall back to `"N/A"` (location
/// to `"Remote"`), salary bounds to `None`, and `tags`/`posted`/`id`
/// to the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawJob {
    pub company: String,
    pub title: String,
    pub location: String,
    /// `"; "`-joined tag string; split into skills by the mapper.
    pub tags: String,
    pub description: String,
    pub url: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    /// Raw upstream date string, parsed later by the mapper.
    pub posted: String,
    /// Source-local identifier; empty when the upstream has none.
    pub id: String,
}

impl Default for RawJob {
    fn default() -> Self {
        Self {
            company: NOT_AVAILABLE.to_string(),
            title: NOT_AVAILABLE.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            tags: String::new(),
            description: NOT_AVAILABLE.to_string(),
            url: NOT_AVAILABLE.to_string(),
            salary_min: None,
            salary_max: None,
            posted: String::new(),
            id: String::new(),
        }
    }
}

/// Work arrangement inferred from the resolved location string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    Remote,
    Hybrid,
    Onsite,
    #[serde(rename = "")]
    Unknown,
}

impl RemoteType {
    /// Infer from a location string: "remote"/"anywhere" substrings
    /// (or the whole string being "n/a") mean remote, "hybrid" means
    /// hybrid, any other non-empty location is onsite.
    pub fn infer(location: &str) -> Self {
        if location.is_empty() {
            return RemoteType::Unknown;
        }
        let loc = location.to_lowercase();
        if loc.contains("remote") || loc.contains("anywhere") || loc == "n/a" {
            RemoteType::Remote
        } else if loc.contains("hybrid") {
            RemoteType::Hybrid
        } else {
            RemoteType::Onsite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteType::Remote => "remote",
            RemoteType::Hybrid => "hybrid",
            RemoteType::Onsite => "onsite",
            RemoteType::Unknown => "",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("salary_range.min must be <= salary_range.max")]
    SalaryBoundsInverted,
    #[error("{field} must be within [0.0, 1.0]")]
    ScoreOutOfRange { field: &'static str },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

/// Salary bounds in USD. Bounds are optional; when both are present
/// `min <= max` must hold (checked by [`SalaryRange::validate`], which
/// API handlers call before accepting a document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            currency: "USD".to_string(),
        }
    }
}

impl SalaryRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(ValidationError::SalaryBoundsInverted),
            _ => Ok(()),
        }
    }
}

/// Canonical job posting every source maps onto before persistence.
///
/// `source` and `ingested_at` are stamped by the storage sink at
/// insertion time, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    /// `{source}_{raw_id}`, or `{source}_{uuid}` when the upstream
    /// record carries no stable id. Globally unique.
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub remote_type: RemoteType,
    pub skills_required: Vec<String>,
    pub posted_date: Option<DateTime<Utc>>,
    pub source_url: String,
    pub source_platform: String,
    pub salary_range: SalaryRange,
}

impl JobPosting {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.external_id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "external_id",
            });
        }
        self.salary_range.validate()
    }
}

/// Kinds of user-job interaction events recorded by the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Viewed,
    Saved,
    Applied,
    Rejected,
    Withdrawn,
}

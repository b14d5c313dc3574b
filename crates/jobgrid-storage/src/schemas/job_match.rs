//! Job match document. `relevancy_score` is supplied by an external
//! matcher and treated as opaque here; only its [0, 1] bounds are
//! checked at the API boundary.

use bson::oid::ObjectId;
use bson::{doc, Document};
use jobgrid_core::ValidationError;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongo::IntoIndexes;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchDetails {
    #[serde(default)]
    pub skills_matched: Vec<String>,
    #[serde(default)]
    pub skills_missing: Vec<String>,
    pub overall_compatibility: f64,
}

impl MatchDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.overall_compatibility) {
            return Err(ValidationError::ScoreOutOfRange {
                field: "overall_compatibility",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatchDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub job_id: ObjectId,
    pub relevancy_score: f64,
    #[serde(default)]
    pub match_reason: Option<String>,
    pub is_active: bool,
    pub matched_at: bson::DateTime,
    pub match_details: MatchDetails,
    /// User preferences/credentials frozen at match time; opaque.
    pub user_snapshot: Document,
}

impl JobMatchDoc {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.relevancy_score) {
            return Err(ValidationError::ScoreOutOfRange {
                field: "relevancy_score",
            });
        }
        self.match_details.validate()
    }
}

impl IntoIndexes for JobMatchDoc {
    const COLLECTION: &'static str = "job_matches";

    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "user_id": 1, "job_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uniq_job_match_user_job".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "user_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("idx_job_matches_user".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "job_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("idx_job_matches_job".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "relevancy_score": 1 },
                Some(
                    IndexOptions::builder()
                        .name("idx_job_matches_score".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

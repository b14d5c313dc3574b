//! Per-user aggregate counters, created alongside the user.

use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::Utc;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongo::IntoIndexes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    #[serde(default)]
    pub jobs_viewed: i64,
    #[serde(default)]
    pub jobs_saved: i64,
    #[serde(default)]
    pub top_missing_skill: Option<String>,
    pub created_at: bson::DateTime,
    #[serde(default)]
    pub last_calculated: Option<bson::DateTime>,
}

impl UserStatsDoc {
    /// Zeroed stats row for a freshly created user.
    pub fn new(user_id: ObjectId) -> Self {
        Self {
            id: None,
            user_id,
            jobs_viewed: 0,
            jobs_saved: 0,
            top_missing_skill: None,
            created_at: bson::DateTime::from_chrono(Utc::now()),
            last_calculated: None,
        }
    }
}

impl IntoIndexes for UserStatsDoc {
    const COLLECTION: &'static str = "user_stats";

    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("uniq_userstats_user".to_string())
                    .build(),
            ),
        )]
    }
}

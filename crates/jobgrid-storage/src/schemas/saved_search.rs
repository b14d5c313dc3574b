//! Saved search document: a named query a user wants re-run.

use bson::oid::ObjectId;
use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongo::IntoIndexes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearchDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub search_name: String,
    /// Free-form filter document; the API treats it as opaque.
    pub search_query: Document,
    #[serde(default)]
    pub total_matches: i64,
    #[serde(default)]
    pub new_matches: i64,
    #[serde(default)]
    pub last_viewed: Option<bson::DateTime>,
    #[serde(default)]
    pub last_match_check: Option<bson::DateTime>,
    pub created_at: bson::DateTime,
}

impl IntoIndexes for SavedSearchDoc {
    const COLLECTION: &'static str = "saved_searches";

    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user_id": 1 },
            Some(
                IndexOptions::builder()
                    .name("idx_savedsearch_user".to_string())
                    .build(),
            ),
        )]
    }
}

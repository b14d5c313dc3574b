//! User-job interaction event. The unique index on the full triple
//! keeps one event per interaction type per user/job pair.

use bson::oid::ObjectId;
use bson::{doc, Document};
use jobgrid_core::InteractionType;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongo::IntoIndexes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub job_id: ObjectId,
    pub interaction_type: InteractionType,
    pub timestamp: bson::DateTime,
}

impl IntoIndexes for InteractionDoc {
    const COLLECTION: &'static str = "user_job_interactions";

    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "user_id": 1, "job_id": 1, "interaction_type": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uniq_user_job_interaction".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "user_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("idx_interactions_user".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "job_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("idx_interactions_job".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

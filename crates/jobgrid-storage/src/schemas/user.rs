//! User profile document.

use bson::oid::ObjectId;
use bson::{doc, Document};
use jobgrid_core::ValidationError;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongo::IntoIndexes;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub desired_locations: Vec<String>,
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
}

impl UserPreferences {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) if min > max => Err(ValidationError::SalaryBoundsInverted),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub preferences: UserPreferences,
    pub created_at: bson::DateTime,
    #[serde(default)]
    pub updated_at: Option<bson::DateTime>,
}

impl IntoIndexes for UserDoc {
    const COLLECTION: &'static str = "users";

    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "email": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("uniq_user_email".to_string())
                    .build(),
            ),
        )]
    }
}

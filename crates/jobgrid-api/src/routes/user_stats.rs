//! Per-user stats, addressed by user id rather than document id.

use axum::extract::{Path, State};
use axum::Json;
use bson::{doc, Bson};
use chrono::{DateTime, Utc};
use jobgrid_storage::schemas::UserStatsDoc;
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::error::{parse_object_id, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateUserStats {
    pub jobs_viewed: Option<i64>,
    pub jobs_saved: Option<i64>,
    pub top_missing_skill: Option<String>,
    pub last_calculated: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub id: String,
    pub user_id: String,
    pub jobs_viewed: i64,
    pub jobs_saved: i64,
    pub top_missing_skill: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_calculated: Option<DateTime<Utc>>,
}

fn response(doc: UserStatsDoc) -> UserStatsResponse {
    UserStatsResponse {
        id: doc.id.map(|o| o.to_hex()).unwrap_or_default(),
        user_id: doc.user_id.to_hex(),
        jobs_viewed: doc.jobs_viewed,
        jobs_saved: doc.jobs_saved,
        top_missing_skill: doc.top_missing_skill,
        created_at: doc.created_at.to_chrono(),
        last_calculated: doc.last_calculated.map(bson::DateTime::to_chrono),
    }
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let oid = parse_object_id(&user_id, "user ID")?;
    let stats = state
        .store
        .typed::<UserStatsDoc>()
        .find_one(doc! { "user_id": oid })
        .await?
        .ok_or(ApiError::NotFound("User stats not found"))?;
    Ok(Json(response(stats)))
}

pub async fn update_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserStats>,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let oid = parse_object_id(&user_id, "user ID")?;

    let mut set = doc! {};
    if let Some(viewed) = payload.jobs_viewed {
        if viewed < 0 {
            return Err(ApiError::Validation("jobs_viewed must be >= 0".into()));
        }
        set.insert("jobs_viewed", viewed);
    }
    if let Some(saved) = payload.jobs_saved {
        if saved < 0 {
            return Err(ApiError::Validation("jobs_saved must be >= 0".into()));
        }
        set.insert("jobs_saved", saved);
    }
    if let Some(skill) = payload.top_missing_skill {
        set.insert("top_missing_skill", skill);
    }
    if let Some(calculated) = payload.last_calculated {
        set.insert(
            "last_calculated",
            Bson::DateTime(bson::DateTime::from_chrono(calculated)),
        );
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let updated = state
        .store
        .typed::<UserStatsDoc>()
        .find_one_and_update(doc! { "user_id": oid }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(ApiError::NotFound("User stats not found"))?;
    Ok(Json(response(updated)))
}

//! Job match CRUD. Scores are externally computed; this layer only
//! enforces bounds and the one-match-per-user/job invariant.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use jobgrid_storage::schemas::{JobMatchDoc, MatchDetails};
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::error::{parse_object_id, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobMatch {
    pub user_id: String,
    pub job_id: String,
    pub relevancy_score: f64,
    #[serde(default)]
    pub match_reason: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub match_details: MatchDetails,
    #[serde(default)]
    pub user_snapshot: Document,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobMatch {
    pub relevancy_score: Option<f64>,
    pub match_reason: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub id: String,
    pub user_id: String,
    pub job_id: String,
    pub relevancy_score: f64,
    pub match_reason: Option<String>,
    pub is_active: bool,
    pub matched_at: DateTime<Utc>,
    pub match_details: MatchDetails,
    pub user_snapshot: Document,
}

fn response(doc: JobMatchDoc) -> JobMatchResponse {
    JobMatchResponse {
        id: doc.id.map(|o| o.to_hex()).unwrap_or_default(),
        user_id: doc.user_id.to_hex(),
        job_id: doc.job_id.to_hex(),
        relevancy_score: doc.relevancy_score,
        match_reason: doc.match_reason,
        is_active: doc.is_active,
        matched_at: doc.matched_at.to_chrono(),
        match_details: doc.match_details,
        user_snapshot: doc.user_snapshot,
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobMatch>,
) -> Result<(StatusCode, Json<JobMatchResponse>), ApiError> {
    let user_id = parse_object_id(&payload.user_id, "user_id")?;
    let job_id = parse_object_id(&payload.job_id, "job_id")?;

    let job_match = JobMatchDoc {
        id: None,
        user_id,
        job_id,
        relevancy_score: payload.relevancy_score,
        match_reason: payload.match_reason,
        is_active: payload.is_active,
        matched_at: bson::DateTime::from_chrono(Utc::now()),
        match_details: payload.match_details,
        user_snapshot: payload.user_snapshot,
    };
    job_match.validate()?;

    let matches = state.store.typed::<JobMatchDoc>();
    let result = matches.insert_one(&job_match).await.map_err(|err| {
        let err = ApiError::from(err);
        match err {
            ApiError::Conflict(_) => {
                ApiError::Conflict("Match already exists for this user and job".into())
            }
            other => other,
        }
    })?;
    let id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Database("insert returned no id".into()))?;

    let created = matches
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(ApiError::NotFound("Job match not found"))?;
    Ok((StatusCode::CREATED, Json(response(created))))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<JobMatchResponse>>, ApiError> {
    let oid = parse_object_id(&user_id, "user_id")?;
    let mut cursor = state
        .store
        .typed::<JobMatchDoc>()
        .find(doc! { "user_id": oid })
        .await?;
    let mut matches = Vec::new();
    while let Some(m) = cursor.try_next().await? {
        matches.push(response(m));
    }
    Ok(Json(matches))
}

pub async fn update(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(payload): Json<UpdateJobMatch>,
) -> Result<Json<JobMatchResponse>, ApiError> {
    let oid = parse_object_id(&match_id, "match ID")?;

    let mut set = doc! {};
    if let Some(score) = payload.relevancy_score {
        if !(0.0..=1.0).contains(&score) {
            return Err(ApiError::Validation(
                "relevancy_score must be within [0.0, 1.0]".into(),
            ));
        }
        set.insert("relevancy_score", score);
    }
    if let Some(reason) = payload.match_reason {
        set.insert("match_reason", reason);
    }
    if let Some(active) = payload.is_active {
        set.insert("is_active", active);
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let updated = state
        .store
        .typed::<JobMatchDoc>()
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(ApiError::NotFound("Job match not found"))?;
    Ok(Json(response(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let oid = parse_object_id(&match_id, "match ID")?;
    let result = state
        .store
        .typed::<JobMatchDoc>()
        .delete_one(doc! { "_id": oid })
        .await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Job match not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

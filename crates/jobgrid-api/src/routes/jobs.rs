//! Job posting CRUD over the canonical schema. Creation mirrors the
//! ingestion invariants: unique `external_id`, validated salary
//! bounds, ingestion stamps applied server-side.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bson::{doc, Bson};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use jobgrid_core::{JobPosting, RemoteType, SalaryRange};
use jobgrid_storage::schemas::{InteractionDoc, JobDoc, JobMatchDoc};
use jobgrid_storage::IntoIndexes;
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::error::{parse_object_id, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJob {
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub remote_type: Option<RemoteType>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_platform: Option<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub remote_type: Option<RemoteType>,
    pub skills_required: Option<Vec<String>>,
    pub posted_date: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
    pub salary_range: Option<SalaryRange>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: String,
    #[serde(flatten)]
    pub posting: JobPosting,
    pub source: String,
    pub ingested_at: DateTime<Utc>,
}

fn job_response(doc: JobDoc) -> JobResponse {
    let id = doc.id.map(|o| o.to_hex()).unwrap_or_default();
    let source = doc.source.clone();
    let ingested_at = doc.ingested_at.to_chrono();
    JobResponse {
        id,
        posting: doc.into_posting(),
        source,
        ingested_at,
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateJob>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let source_platform = payload.source_platform.unwrap_or_default();
    let posting = JobPosting {
        external_id: payload.external_id,
        title: payload.title,
        company: payload.company,
        description: payload.description,
        remote_type: payload
            .remote_type
            .unwrap_or_else(|| RemoteType::infer(&payload.location)),
        location: payload.location,
        skills_required: payload.skills_required,
        posted_date: payload.posted_date,
        source_url: payload.source_url.unwrap_or_default(),
        source_platform: source_platform.clone(),
        salary_range: payload.salary_range.unwrap_or_default(),
    };
    posting.validate()?;

    let jobs = state.store.typed::<JobDoc>();
    if jobs
        .find_one(doc! { "external_id": &posting.external_id })
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Job with this external_id already exists".into(),
        ));
    }

    let doc = JobDoc::from_posting(posting, &source_platform, Utc::now());
    let result = jobs.insert_one(&doc).await.map_err(|err| {
        let err = ApiError::from(err);
        match err {
            ApiError::Conflict(_) => {
                ApiError::Conflict("Job with this external_id already exists".into())
            }
            other => other,
        }
    })?;
    let job_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Database("insert returned no id".into()))?;

    let created = jobs
        .find_one(doc! { "_id": job_id })
        .await?
        .ok_or(ApiError::NotFound("Job not found"))?;
    Ok((StatusCode::CREATED, Json(job_response(created))))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JobResponse>>, ApiError> {
    let mut cursor = state.store.typed::<JobDoc>().find(doc! {}).await?;
    let mut jobs = Vec::new();
    while let Some(job) = cursor.try_next().await? {
        jobs.push(job_response(job));
    }
    Ok(Json(jobs))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let oid = parse_object_id(&job_id, "job ID")?;
    let job = state
        .store
        .typed::<JobDoc>()
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or(ApiError::NotFound("Job not found"))?;
    Ok(Json(job_response(job)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(payload): Json<UpdateJob>,
) -> Result<Json<JobResponse>, ApiError> {
    let oid = parse_object_id(&job_id, "job ID")?;

    let mut set = doc! {};
    if let Some(title) = payload.title {
        set.insert("title", title);
    }
    if let Some(company) = payload.company {
        set.insert("company", company);
    }
    if let Some(description) = payload.description {
        set.insert("description", description);
    }
    if let Some(location) = payload.location {
        set.insert("location", location);
    }
    if let Some(remote_type) = payload.remote_type {
        set.insert("remote_type", remote_type.as_str());
    }
    if let Some(skills) = payload.skills_required {
        set.insert("skills_required", skills);
    }
    if let Some(posted_date) = payload.posted_date {
        set.insert(
            "posted_date",
            Bson::DateTime(bson::DateTime::from_chrono(posted_date)),
        );
    }
    if let Some(source_url) = payload.source_url {
        set.insert("source_url", source_url);
    }
    if let Some(salary_range) = payload.salary_range {
        salary_range.validate()?;
        set.insert(
            "salary_range",
            bson::to_bson(&salary_range).map_err(|e| ApiError::Database(e.to_string()))?,
        );
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let updated = state
        .store
        .typed::<JobDoc>()
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(ApiError::NotFound("Job not found"))?;
    Ok(Json(job_response(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let oid = parse_object_id(&job_id, "job ID")?;

    let result = state
        .store
        .typed::<JobDoc>()
        .delete_one(doc! { "_id": oid })
        .await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Job not found"));
    }

    // Cascade records referencing the deleted job.
    let db = state.store.database();
    db.collection::<InteractionDoc>(InteractionDoc::COLLECTION)
        .delete_many(doc! { "job_id": oid })
        .await?;
    db.collection::<JobMatchDoc>(JobMatchDoc::COLLECTION)
        .delete_many(doc! { "job_id": oid })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

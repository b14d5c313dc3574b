//! Saved search CRUD; searches hang off a user and their query body
//! is opaque to the API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use jobgrid_storage::schemas::SavedSearchDoc;
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::error::{parse_object_id, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSavedSearch {
    pub user_id: String,
    pub search_name: String,
    pub search_query: Document,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSavedSearch {
    pub search_name: Option<String>,
    pub search_query: Option<Document>,
    pub total_matches: Option<i64>,
    pub new_matches: Option<i64>,
    pub last_viewed: Option<DateTime<Utc>>,
    pub last_match_check: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SavedSearchResponse {
    pub id: String,
    pub user_id: String,
    pub search_name: String,
    pub search_query: Document,
    pub total_matches: i64,
    pub new_matches: i64,
    pub last_viewed: Option<DateTime<Utc>>,
    pub last_match_check: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn response(doc: SavedSearchDoc) -> SavedSearchResponse {
    SavedSearchResponse {
        id: doc.id.map(|o| o.to_hex()).unwrap_or_default(),
        user_id: doc.user_id.to_hex(),
        search_name: doc.search_name,
        search_query: doc.search_query,
        total_matches: doc.total_matches,
        new_matches: doc.new_matches,
        last_viewed: doc.last_viewed.map(bson::DateTime::to_chrono),
        last_match_check: doc.last_match_check.map(bson::DateTime::to_chrono),
        created_at: doc.created_at.to_chrono(),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateSavedSearch>,
) -> Result<(StatusCode, Json<SavedSearchResponse>), ApiError> {
    let user_id = parse_object_id(&payload.user_id, "user_id")?;
    if payload.search_name.trim().is_empty() {
        return Err(ApiError::Validation("search_name must not be empty".into()));
    }

    let search = SavedSearchDoc {
        id: None,
        user_id,
        search_name: payload.search_name,
        search_query: payload.search_query,
        total_matches: 0,
        new_matches: 0,
        last_viewed: None,
        last_match_check: None,
        created_at: bson::DateTime::from_chrono(Utc::now()),
    };

    let searches = state.store.typed::<SavedSearchDoc>();
    let result = searches.insert_one(&search).await?;
    let id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Database("insert returned no id".into()))?;

    let created = searches
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(ApiError::NotFound("Saved search not found"))?;
    Ok((StatusCode::CREATED, Json(response(created))))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SavedSearchResponse>>, ApiError> {
    let oid = parse_object_id(&user_id, "user_id")?;
    let mut cursor = state
        .store
        .typed::<SavedSearchDoc>()
        .find(doc! { "user_id": oid })
        .await?;
    let mut searches = Vec::new();
    while let Some(search) = cursor.try_next().await? {
        searches.push(response(search));
    }
    Ok(Json(searches))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
) -> Result<Json<SavedSearchResponse>, ApiError> {
    let oid = parse_object_id(&search_id, "search ID")?;
    let search = state
        .store
        .typed::<SavedSearchDoc>()
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or(ApiError::NotFound("Saved search not found"))?;
    Ok(Json(response(search)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
    Json(payload): Json<UpdateSavedSearch>,
) -> Result<Json<SavedSearchResponse>, ApiError> {
    let oid = parse_object_id(&search_id, "search ID")?;

    let mut set = doc! {};
    if let Some(name) = payload.search_name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("search_name must not be empty".into()));
        }
        set.insert("search_name", name);
    }
    if let Some(query) = payload.search_query {
        set.insert("search_query", query);
    }
    if let Some(total) = payload.total_matches {
        set.insert("total_matches", total);
    }
    if let Some(new_matches) = payload.new_matches {
        set.insert("new_matches", new_matches);
    }
    if let Some(viewed) = payload.last_viewed {
        set.insert("last_viewed", Bson::DateTime(bson::DateTime::from_chrono(viewed)));
    }
    if let Some(checked) = payload.last_match_check {
        set.insert(
            "last_match_check",
            Bson::DateTime(bson::DateTime::from_chrono(checked)),
        );
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }

    let updated = state
        .store
        .typed::<SavedSearchDoc>()
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(ApiError::NotFound("Saved search not found"))?;
    Ok(Json(response(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let oid = parse_object_id(&search_id, "search ID")?;
    let result = state
        .store
        .typed::<SavedSearchDoc>()
        .delete_one(doc! { "_id": oid })
        .await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Saved search not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

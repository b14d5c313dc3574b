//! User-job interaction events. The unique (user, job, type) triple
//! makes repeated events a 409 rather than silent duplicates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bson::doc;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use jobgrid_core::InteractionType;
use jobgrid_storage::schemas::InteractionDoc;
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::error::{parse_object_id, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateInteraction {
    pub user_id: String,
    pub job_id: String,
    pub interaction_type: InteractionType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInteraction {
    pub interaction_type: Option<InteractionType>,
}

#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    pub id: String,
    pub user_id: String,
    pub job_id: String,
    pub interaction_type: InteractionType,
    pub timestamp: DateTime<Utc>,
}

fn response(doc: InteractionDoc) -> InteractionResponse {
    InteractionResponse {
        id: doc.id.map(|o| o.to_hex()).unwrap_or_default(),
        user_id: doc.user_id.to_hex(),
        job_id: doc.job_id.to_hex(),
        interaction_type: doc.interaction_type,
        timestamp: doc.timestamp.to_chrono(),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateInteraction>,
) -> Result<(StatusCode, Json<InteractionResponse>), ApiError> {
    let user_id = parse_object_id(&payload.user_id, "user_id")?;
    let job_id = parse_object_id(&payload.job_id, "job_id")?;

    let interaction = InteractionDoc {
        id: None,
        user_id,
        job_id,
        interaction_type: payload.interaction_type,
        timestamp: bson::DateTime::from_chrono(Utc::now()),
    };

    let interactions = state.store.typed::<InteractionDoc>();
    let result = interactions.insert_one(&interaction).await.map_err(|err| {
        let err = ApiError::from(err);
        match err {
            ApiError::Conflict(_) => ApiError::Conflict(
                "Interaction of this type already exists for this user and job".into(),
            ),
            other => other,
        }
    })?;
    let id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Database("insert returned no id".into()))?;

    let created = interactions
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(ApiError::NotFound("Interaction not found"))?;
    Ok((StatusCode::CREATED, Json(response(created))))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<InteractionResponse>>, ApiError> {
    let oid = parse_object_id(&user_id, "user_id")?;
    let mut cursor = state
        .store
        .typed::<InteractionDoc>()
        .find(doc! { "user_id": oid })
        .await?;
    let mut interactions = Vec::new();
    while let Some(event) = cursor.try_next().await? {
        interactions.push(response(event));
    }
    Ok(Json(interactions))
}

pub async fn list_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<InteractionResponse>>, ApiError> {
    let oid = parse_object_id(&job_id, "job_id")?;
    let mut cursor = state
        .store
        .typed::<InteractionDoc>()
        .find(doc! { "job_id": oid })
        .await?;
    let mut interactions = Vec::new();
    while let Some(event) = cursor.try_next().await? {
        interactions.push(response(event));
    }
    Ok(Json(interactions))
}

pub async fn update(
    State(state): State<AppState>,
    Path(interaction_id): Path<String>,
    Json(payload): Json<UpdateInteraction>,
) -> Result<Json<InteractionResponse>, ApiError> {
    let oid = parse_object_id(&interaction_id, "interaction ID")?;
    let Some(interaction_type) = payload.interaction_type else {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    };

    let updated = state
        .store
        .typed::<InteractionDoc>()
        .find_one_and_update(
            doc! { "_id": oid },
            doc! { "$set": {
                "interaction_type": bson::to_bson(&interaction_type)
                    .map_err(|e| ApiError::Database(e.to_string()))?,
                "timestamp": bson::DateTime::from_chrono(Utc::now()),
            }},
        )
        .return_document(ReturnDocument::After)
        .await
        .map_err(|err| {
            let err = ApiError::from(err);
            match err {
                ApiError::Conflict(_) => ApiError::Conflict(
                    "Interaction of this type already exists for this user and job".into(),
                ),
                other => other,
            }
        })?
        .ok_or(ApiError::NotFound("Interaction not found"))?;
    Ok(Json(response(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(interaction_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let oid = parse_object_id(&interaction_id, "interaction ID")?;
    let result = state
        .store
        .typed::<InteractionDoc>()
        .delete_one(doc! { "_id": oid })
        .await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Interaction not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

//! User profile CRUD. Creating a user also seeds its stats row;
//! deleting one cascades to everything keyed on the user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bson::{doc, Bson};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use jobgrid_storage::schemas::{
    InteractionDoc, JobMatchDoc, SavedSearchDoc, UserDoc, UserPreferences, UserStatsDoc,
};
use jobgrid_storage::IntoIndexes;
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::error::{parse_object_id, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub preferences: UserPreferences,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferences: Option<UserPreferences>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn user_response(doc: UserDoc) -> UserResponse {
    UserResponse {
        id: doc.id.map(|o| o.to_hex()).unwrap_or_default(),
        name: doc.name,
        email: doc.email,
        preferences: doc.preferences,
        created_at: doc.created_at.to_chrono(),
        updated_at: doc.updated_at.map(bson::DateTime::to_chrono),
    }
}

fn validate_profile(name: &str, email: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation("email is not valid".into()));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_profile(&payload.name, &payload.email)?;
    payload.preferences.validate()?;

    let user = UserDoc {
        id: None,
        name: payload.name,
        email: payload.email,
        preferences: payload.preferences,
        created_at: bson::DateTime::from_chrono(Utc::now()),
        updated_at: None,
    };

    let users = state.store.typed::<UserDoc>();
    let result = users.insert_one(&user).await.map_err(|err| {
        let err = ApiError::from(err);
        match err {
            ApiError::Conflict(_) => {
                ApiError::Conflict("User with this email already exists".into())
            }
            other => other,
        }
    })?;
    let user_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Database("insert returned no id".into()))?;

    // Seed the user's stats row alongside the profile.
    state
        .store
        .typed::<UserStatsDoc>()
        .insert_one(UserStatsDoc::new(user_id))
        .await?;

    let created = users
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok((StatusCode::CREATED, Json(user_response(created))))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let mut cursor = state.store.typed::<UserDoc>().find(doc! {}).await?;
    let mut users = Vec::new();
    while let Some(user) = cursor.try_next().await? {
        users.push(user_response(user));
    }
    Ok(Json(users))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let oid = parse_object_id(&user_id, "user ID")?;
    let user = state
        .store
        .typed::<UserDoc>()
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(user_response(user)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let oid = parse_object_id(&user_id, "user ID")?;

    let mut set = doc! {};
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be empty".into()));
        }
        set.insert("name", name);
    }
    if let Some(email) = payload.email {
        if !email.contains('@') {
            return Err(ApiError::Validation("email is not valid".into()));
        }
        set.insert("email", email);
    }
    if let Some(preferences) = payload.preferences {
        preferences.validate()?;
        set.insert(
            "preferences",
            bson::to_bson(&preferences).map_err(|e| ApiError::Database(e.to_string()))?,
        );
    }
    if set.is_empty() {
        return Err(ApiError::BadRequest("No fields provided for update".into()));
    }
    set.insert("updated_at", Bson::DateTime(bson::DateTime::from_chrono(Utc::now())));

    let updated = state
        .store
        .typed::<UserDoc>()
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(user_response(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let oid = parse_object_id(&user_id, "user ID")?;
    let db = state.store.database();

    // Cascade everything keyed on the user before removing the
    // profile itself.
    db.collection::<UserStatsDoc>(UserStatsDoc::COLLECTION)
        .delete_one(doc! { "user_id": oid })
        .await?;
    db.collection::<SavedSearchDoc>(SavedSearchDoc::COLLECTION)
        .delete_many(doc! { "user_id": oid })
        .await?;
    db.collection::<InteractionDoc>(InteractionDoc::COLLECTION)
        .delete_many(doc! { "user_id": oid })
        .await?;
    db.collection::<JobMatchDoc>(JobMatchDoc::COLLECTION)
        .delete_many(doc! { "user_id": oid })
        .await?;

    let result = state
        .store
        .typed::<UserDoc>()
        .delete_one(doc! { "_id": oid })
        .await?;
    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("User not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

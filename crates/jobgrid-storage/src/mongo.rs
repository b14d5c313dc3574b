//! MongoDB client wrapper and schema-owned index definitions.

use bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::info;

use crate::schemas::{
    InteractionDoc, JobDoc, JobMatchDoc, SavedSearchDoc, UserDoc, UserStatsDoc,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to MongoDB: {0}")]
    Connect(#[source] mongodb::error::Error),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Schemas declare the indexes their collection needs; the store
/// applies them once at startup.
pub trait IntoIndexes {
    const COLLECTION: &'static str;
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Detect a unique-index violation so the API layer can answer 409
/// instead of 500.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::InsertMany(insert_error) => insert_error
            .write_errors
            .as_ref()
            .map(|errors| errors.iter().any(|e| e.code == 11000))
            .unwrap_or(false),
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect and verify with a ping; short server-selection timeout
    /// so an unreachable server fails fast instead of hanging.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let timeout_uri = if uri.contains('?') {
            format!("{uri}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        } else {
            format!("{uri}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(StoreError::Connect)?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(StoreError::Connect)?;

        info!(db_name, "connected to MongoDB");
        Ok(Self { db })
    }

    /// Build a handle without pinging; the driver connects lazily on
    /// first use. Suits request-scoped callers that prefer surfacing
    /// connectivity problems per operation.
    pub async fn lazy(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await.map_err(StoreError::Connect)?;
        Ok(Self {
            db: client.database(db_name),
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.db.collection::<T>(name)
    }

    /// Typed collection at a schema's default name.
    pub fn typed<T>(&self) -> Collection<T>
    where
        T: IntoIndexes + Serialize + DeserializeOwned + Send + Sync,
    {
        self.db.collection::<T>(T::COLLECTION)
    }

    async fn apply_indices<T: IntoIndexes>(&self) -> Result<(), StoreError> {
        let models: Vec<IndexModel> = T::into_indices()
            .into_iter()
            .map(|(keys, options)| IndexModel::builder().keys(keys).options(options).build())
            .collect();
        if models.is_empty() {
            return Ok(());
        }
        self.db
            .collection::<Document>(T::COLLECTION)
            .create_indexes(models)
            .await?;
        Ok(())
    }

    /// Apply every schema's indexes. The unique index on
    /// `jobs.external_id` is the cross-run dedup backstop.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.apply_indices::<JobDoc>().await?;
        self.apply_indices::<UserDoc>().await?;
        self.apply_indices::<SavedSearchDoc>().await?;
        self.apply_indices::<UserStatsDoc>().await?;
        self.apply_indices::<JobMatchDoc>().await?;
        self.apply_indices::<InteractionDoc>().await?;
        info!("MongoDB indexes ensured");
        Ok(())
    }
}

//! Ingestion configuration, built once from the environment and
//! passed explicitly to the components that need it.

use std::time::Duration;

use jobgrid_sources::SourceCredentials;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set. Add it to your environment or .env file.")]
    Missing(&'static str),
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Per-source credentials from the environment. Split out so paths
/// that never touch the store (CSV export) can skip the required
/// MongoDB variables.
pub fn credentials_from_env() -> SourceCredentials {
    SourceCredentials {
        adzuna_app_id: optional("ADZUNA_APP_ID"),
        adzuna_api_key: optional("ADZUNA_API_KEY"),
        muse_api_key: optional("MUSE_API_KEY"),
        serpapi_api_key: optional("SERPAPI_API_KEY"),
        usajobs_api_key: optional("USAJOBS_API_KEY"),
        usajobs_user_agent: optional("USAJOBS_USER_AGENT"),
    }
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// MONGODB_CONNECT_STRING (required).
    pub mongodb_uri: String,
    /// PROD_DB (required) — database name.
    pub db_name: String,
    /// MONGO_JOBS_COLLECTION (required) — target collection.
    pub jobs_collection: String,
    /// Per-source API credentials; each source validates what it
    /// needs at call time.
    pub credentials: SourceCredentials,
    pub http_timeout: Duration,
    pub user_agent: String,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mongodb_uri: required("MONGODB_CONNECT_STRING")?,
            db_name: required("PROD_DB")?,
            jobs_collection: required("MONGO_JOBS_COLLECTION")?,
            credentials: credentials_from_env(),
            http_timeout: optional("JOBGRID_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(jobgrid_sources::fetch::DEFAULT_TIMEOUT),
            user_agent: optional("JOBGRID_USER_AGENT")
                .unwrap_or_else(|| jobgrid_sources::fetch::DEFAULT_USER_AGENT.to_string()),
        })
    }
}

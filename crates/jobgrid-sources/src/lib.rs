//! Source adapter contracts + the eight job-board source definitions.
//!
//! Each source pairs a [`spec::SourceSpec`] mapping table with a
//! fetcher for its HTTP API. Extraction is the generic table walker in
//! [`spec`]; per-source oddities live in [`JobSource::fixup`].

use async_trait::async_trait;
use jobgrid_core::RawJob;
use serde_json::Value as JsonValue;
use thiserror::Error;

pub mod clean;
pub mod fetch;
pub mod salary;
pub mod sources;
pub mod spec;

pub use fetch::{FetchError, HttpClient};
pub use spec::SourceSpec;

pub const CRATE_NAME: &str = "jobgrid-sources";

/// Per-source API credentials, resolved once from the environment by
/// the ingest configuration and passed down explicitly. Every field is
/// optional here; a source that needs one validates at call time and
/// names the missing variable.
#[derive(Debug, Clone, Default)]
pub struct SourceCredentials {
    pub adzuna_app_id: Option<String>,
    pub adzuna_api_key: Option<String>,
    pub muse_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub usajobs_api_key: Option<String>,
    pub usajobs_user_agent: Option<String>,
}

impl SourceCredentials {
    /// Fetch a required credential or fail naming its variable.
    pub fn require<'a>(
        &self,
        value: &'a Option<String>,
        var: &'static str,
    ) -> Result<&'a str, SourceError> {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(SourceError::MissingCredential(var))
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} is not set; add it to your environment or .env file")]
    MissingCredential(&'static str),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// One upstream job board: a label, a field-mapping table, and a
/// fetcher. `extract` never fails; `fetch_page` errors are skipped at
/// the title/page granularity by the pipeline.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Source label, e.g. `"Adzuna"`; becomes `source_platform`.
    fn name(&self) -> &'static str;

    fn spec(&self) -> &'static SourceSpec;

    /// Fetch one page of raw records for a job-title query. Sources
    /// without pagination return an empty page for `page > 1`, which
    /// bounds the pipeline's loop.
    async fn fetch_page(
        &self,
        http: &HttpClient,
        creds: &SourceCredentials,
        query: &str,
        page: u32,
    ) -> Result<Vec<JsonValue>, SourceError>;

    /// Source-specific adjustments the mapping table cannot express.
    fn fixup(&self, _raw: &JsonValue, _job: &mut RawJob) {}

    /// Map one raw record to the flat intermediate shape.
    fn extract(&self, raw: &JsonValue) -> RawJob {
        let mut job = spec::extract(self.spec(), raw);
        self.fixup(raw, &mut job);
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_error_names_the_variable() {
        let creds = SourceCredentials::default();
        let err = creds
            .require(&creds.adzuna_app_id, "ADZUNA_APP_ID")
            .unwrap_err();
        assert!(err.to_string().contains("ADZUNA_APP_ID"));
    }

    #[test]
    fn empty_credential_counts_as_missing() {
        let creds = SourceCredentials {
            serpapi_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(creds
            .require(&creds.serpapi_api_key, "SERPAPI_API_KEY")
            .is_err());
    }
}

//! Fetch → extract → dedup → map → insert, one source at a time.
//!
//! Sequential by design: one title, one page per request. Fetch
//! failures are skipped at the title/page granularity; a missing
//! credential aborts the source immediately (configuration errors are
//! never skipped past).

use anyhow::{Context, Result};
use chrono::Utc;
use jobgrid_core::JobPosting;
use jobgrid_sources::{HttpClient, JobSource, SourceCredentials, SourceError};
use jobgrid_storage::{insert_postings, MongoStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::canonical::to_canonical;
use crate::config::IngestConfig;
use crate::dedup::Deduplicator;

/// Default query list when the caller supplies none.
pub const DEFAULT_JOB_TITLES: &[&str] = &["Software Engineer"];

/// Hard cap on pages per title; the only guard against unbounded
/// iteration.
pub const DEFAULT_MAX_PAGES: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub source: String,
    pub started_at: chrono::DateTime<Utc>,
    pub finished_at: chrono::DateTime<Utc>,
    pub titles: usize,
    pub fetched: usize,
    pub unique: usize,
    pub inserted: usize,
}

/// Fetch and normalize one source without persisting. Returns the
/// canonical postings (first-seen order) plus the raw fetch count.
pub async fn collect_postings(
    http: &HttpClient,
    creds: &SourceCredentials,
    source: &dyn JobSource,
    titles: &[String],
    max_pages: u32,
) -> Result<(Vec<JobPosting>, usize)> {
    let mut dedup = Deduplicator::new();
    let mut fetched = 0usize;
    let mut postings = Vec::new();

    for title in titles {
        for page in 1..=max_pages.max(1) {
            let raw_records = match source.fetch_page(http, creds, title, page).await {
                Ok(records) => records,
                Err(SourceError::MissingCredential(var)) => {
                    return Err(SourceError::MissingCredential(var))
                        .with_context(|| format!("configuring {}", source.name()));
                }
                Err(err) => {
                    warn!(
                        source = source.name(),
                        title, page, error = %err,
                        "fetch failed; skipping page"
                    );
                    continue;
                }
            };

            if raw_records.is_empty() {
                // Past the last page (or a source without pagination);
                // move to the next title.
                break;
            }

            fetched += raw_records.len();
            for raw in &raw_records {
                let job = source.extract(raw);
                if dedup.keep(&job) {
                    postings.push(to_canonical(&job, source.name()));
                }
            }
        }
    }

    info!(
        source = source.name(),
        fetched,
        unique = postings.len(),
        "collected canonical postings"
    );
    Ok((postings, fetched))
}

pub struct IngestPipeline {
    config: IngestConfig,
    http: HttpClient,
    store: MongoStore,
}

impl IngestPipeline {
    /// Build the HTTP client, connect to the store, and apply indexes.
    pub async fn connect(config: IngestConfig) -> Result<Self> {
        let http = HttpClient::new(config.http_timeout, &config.user_agent)
            .context("building HTTP client")?;
        let store = MongoStore::connect(&config.mongodb_uri, &config.db_name)
            .await
            .context("connecting to MongoDB")?;
        store
            .ensure_indexes()
            .await
            .context("ensuring MongoDB indexes")?;
        Ok(Self {
            config,
            http,
            store,
        })
    }

    pub fn store(&self) -> &MongoStore {
        &self.store
    }

    /// Run one source end to end: collect then batch-insert. The
    /// insert is all-or-nothing per batch; a failed write surfaces the
    /// database error to the caller.
    pub async fn run_source(
        &self,
        source: &dyn JobSource,
        titles: &[String],
        max_pages: u32,
    ) -> Result<IngestSummary> {
        let started_at = Utc::now();
        let (postings, fetched) = collect_postings(
            &self.http,
            &self.config.credentials,
            source,
            titles,
            max_pages,
        )
        .await?;
        let unique = postings.len();

        let inserted = insert_postings(
            &self.store,
            &self.config.jobs_collection,
            postings,
            source.name(),
        )
        .await
        .with_context(|| format!("inserting {} documents", source.name()))?;

        Ok(IngestSummary {
            source: source.name().to_string(),
            started_at,
            finished_at: Utc::now(),
            titles: titles.len(),
            fetched,
            unique,
            inserted,
        })
    }
}

/// Resolve the title list, falling back to the default queries.
pub fn titles_or_default(titles: &[String]) -> Vec<String> {
    if titles.is_empty() {
        DEFAULT_JOB_TITLES.iter().map(|s| s.to_string()).collect()
    } else {
        titles.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_lists_fall_back_to_defaults() {
        assert_eq!(titles_or_default(&[]), vec!["Software Engineer"]);
        let custom = vec!["Data Engineer".to_string()];
        assert_eq!(titles_or_default(&custom), custom);
    }
}

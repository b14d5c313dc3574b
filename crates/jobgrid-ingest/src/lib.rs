//! Ingestion pipeline: per-source fetch, canonical normalization,
//! first-seen dedup, and append-only persistence.

pub mod canonical;
pub mod config;
pub mod dates;
pub mod dedup;
pub mod pipeline;

pub use canonical::{split_tags, to_canonical};
pub use config::{credentials_from_env, ConfigError, IngestConfig};
pub use dedup::{dedup_key, Deduplicator};
pub use pipeline::{
    collect_postings, titles_or_default, IngestPipeline, IngestSummary, DEFAULT_JOB_TITLES,
    DEFAULT_MAX_PAGES,
};

pub const CRATE_NAME: &str = "jobgrid-ingest";

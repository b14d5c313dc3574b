//! MongoDB document store + persistence sinks for JobGrid.

pub mod mongo;
pub mod schemas;
pub mod sink;

pub use mongo::{is_duplicate_key, IntoIndexes, MongoStore, StoreError};
pub use sink::{export_postings_csv, insert_postings, CANONICAL_CSV_FIELDS};

pub const CRATE_NAME: &str = "jobgrid-storage";

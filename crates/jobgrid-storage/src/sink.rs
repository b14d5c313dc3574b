//! Persistence sinks for canonical postings: append-only MongoDB
//! batch insert and canonical CSV export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use jobgrid_core::JobPosting;
use tracing::info;

use crate::mongo::{MongoStore, StoreError};
use crate::schemas::JobDoc;

/// Canonical CSV column order: the DB schema flattened for one row.
pub const CANONICAL_CSV_FIELDS: [&str; 13] = [
    "external_id",
    "title",
    "company",
    "description",
    "location",
    "remote_type",
    "skills_required",
    "posted_date",
    "source_url",
    "source_platform",
    "salary_min",
    "salary_max",
    "salary_currency",
];

/// Append canonical postings to a collection, stamping `source` and
/// `ingested_at`. Insert-only: the unique index on `external_id`
/// rejects duplicates from earlier runs, and a failed write surfaces
/// the database error unchanged (no retry).
pub async fn insert_postings(
    store: &MongoStore,
    collection: &str,
    postings: Vec<JobPosting>,
    source: &str,
) -> Result<usize, StoreError> {
    if postings.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();
    let docs: Vec<JobDoc> = postings
        .into_iter()
        .map(|posting| JobDoc::from_posting(posting, source, now))
        .collect();

    let result = store.collection::<JobDoc>(collection).insert_many(docs).await?;
    let inserted = result.inserted_ids.len();
    info!(source, collection, inserted, "inserted job documents");
    Ok(inserted)
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write canonical postings to a CSV file in `dir`, returning its
/// path. File name defaults to `{prefix}_{YYYYmmdd_HH_MM_SS}.csv`.
pub fn export_postings_csv(
    postings: &[JobPosting],
    dir: impl AsRef<Path>,
    file_prefix: &str,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let prefix = file_prefix.replace(' ', "_").to_lowercase();
    let timestamp = Utc::now().format("%Y%m%d_%H_%M_%S");
    let path = dir.join(format!("{prefix}_{timestamp}.csv"));

    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer
        .write_record(CANONICAL_CSV_FIELDS)
        .context("writing CSV header")?;

    for posting in postings {
        let row: [String; 13] = [
            posting.external_id.clone(),
            posting.title.clone(),
            posting.company.clone(),
            posting.description.clone(),
            posting.location.clone(),
            posting.remote_type.as_str().to_string(),
            posting.skills_required.join("; "),
            posting
                .posted_date
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            posting.source_url.clone(),
            posting.source_platform.clone(),
            optional_number(posting.salary_range.min),
            optional_number(posting.salary_range.max),
            posting.salary_range.currency.clone(),
        ];
        writer.write_record(&row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV writer")?;

    info!(rows = postings.len(), path = %path.display(), "exported canonical CSV");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jobgrid_core::{RemoteType, SalaryRange};
    use tempfile::tempdir;

    fn posting(external_id: &str) -> JobPosting {
        JobPosting {
            external_id: external_id.into(),
            title: "Software Engineer".into(),
            company: "Acme".into(),
            description: "Build things.".into(),
            location: "Remote".into(),
            remote_type: RemoteType::Remote,
            skills_required: vec!["rust".into(), "mongodb".into()],
            posted_date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).single().unwrap()),
            source_url: "https://example.test/1".into(),
            source_platform: "Adzuna".into(),
            salary_range: SalaryRange::new(Some(90_000.0), None),
        }
    }

    #[test]
    fn csv_export_writes_fixed_header_and_rows() {
        let dir = tempdir().expect("tempdir");
        let path = export_postings_csv(
            &[posting("Adzuna_1"), posting("Adzuna_2")],
            dir.path(),
            "Adzuna",
        )
        .expect("export");

        let contents = std::fs::read_to_string(&path).expect("read csv");
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "external_id,title,company,description,location,remote_type,skills_required,\
             posted_date,source_url,source_platform,salary_min,salary_max,salary_currency"
        );
        assert_eq!(lines.count(), 2);
        assert!(contents.contains("rust; mongodb"));
        assert!(contents.contains("2024-01-15T10:00:00+00:00"));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("adzuna_"));
    }
}

//! Canonical job posting document.
//!
//! The stored shape is the canonical schema plus the two fields the
//! sink stamps at insertion time (`source`, `ingested_at`).

use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use jobgrid_core::{JobPosting, RemoteType, SalaryRange};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongo::IntoIndexes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub remote_type: RemoteType,
    pub skills_required: Vec<String>,
    pub posted_date: Option<bson::DateTime>,
    pub source_url: String,
    pub source_platform: String,
    pub salary_range: SalaryRange,
    pub source: String,
    pub ingested_at: bson::DateTime,
}

impl JobDoc {
    pub fn from_posting(posting: JobPosting, source: &str, ingested_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            external_id: posting.external_id,
            title: posting.title,
            company: posting.company,
            description: posting.description,
            location: posting.location,
            remote_type: posting.remote_type,
            skills_required: posting.skills_required,
            posted_date: posting.posted_date.map(bson::DateTime::from_chrono),
            source_url: posting.source_url,
            source_platform: posting.source_platform,
            salary_range: posting.salary_range,
            source: source.to_string(),
            ingested_at: bson::DateTime::from_chrono(ingested_at),
        }
    }

    /// Back to the canonical shape, dropping the store-assigned id and
    /// ingestion stamps.
    pub fn into_posting(self) -> JobPosting {
        JobPosting {
            external_id: self.external_id,
            title: self.title,
            company: self.company,
            description: self.description,
            location: self.location,
            remote_type: self.remote_type,
            skills_required: self.skills_required,
            posted_date: self.posted_date.map(bson::DateTime::to_chrono),
            source_url: self.source_url,
            source_platform: self.source_platform,
            salary_range: self.salary_range,
        }
    }
}

impl IntoIndexes for JobDoc {
    const COLLECTION: &'static str = "jobs";

    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "external_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("uniq_external_job".to_string())
                    .build(),
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_posting() -> JobPosting {
        JobPosting {
            external_id: "RemoteOK_123456".into(),
            title: "Software Engineer".into(),
            company: "TechCorp Inc.".into(),
            description: "Build scalable web applications.".into(),
            location: "Remote".into(),
            remote_type: RemoteType::Remote,
            skills_required: vec!["python".into(), "remote".into()],
            posted_date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).single().unwrap()),
            source_url: "https://remoteok.com/remote-jobs/123456".into(),
            source_platform: "RemoteOK".into(),
            salary_range: SalaryRange::new(Some(70_000.0), Some(110_000.0)),
        }
    }

    #[test]
    fn posting_round_trips_through_the_document_shape() {
        let posting = sample_posting();
        let doc = JobDoc::from_posting(posting.clone(), "RemoteOK", Utc::now());
        assert_eq!(doc.source, "RemoteOK");
        assert_eq!(doc.into_posting(), posting);
    }

    #[test]
    fn document_serializes_every_canonical_field() {
        let doc = JobDoc::from_posting(sample_posting(), "RemoteOK", Utc::now());
        let value = bson::to_document(&doc).unwrap();
        for key in [
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
            "salary_range",
            "source",
            "ingested_at",
        ] {
            assert!(value.contains_key(key), "missing {key}");
        }
        assert!(!value.contains_key("_id"));
    }
}

//! Canonical mapping: flat intermediate record + source label → the
//! unified job-posting schema. Output always carries every canonical
//! field so downstream insertion never special-cases missing keys.

use jobgrid_core::{JobPosting, RawJob, RemoteType, SalaryRange, DEFAULT_LOCATION, NOT_AVAILABLE};
use uuid::Uuid;

use crate::dates;

/// Split a `;`/`,`-delimited tag string into skills, trimming and
/// dropping empties, order preserved.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn external_id(raw_id: &str, source: &str) -> String {
    let id = raw_id.trim();
    if id.is_empty() || id == NOT_AVAILABLE {
        // No stable upstream id: a fresh suffix keeps records from
        // colliding with each other or with any real id.
        format!("{source}_{}", Uuid::new_v4().simple())
    } else {
        format!("{source}_{id}")
    }
}

pub fn to_canonical(raw: &RawJob, source: &str) -> JobPosting {
    let location = if raw.location.is_empty() || raw.location == NOT_AVAILABLE {
        DEFAULT_LOCATION.to_string()
    } else {
        raw.location.clone()
    };

    JobPosting {
        external_id: external_id(&raw.id, source),
        title: raw.title.clone(),
        company: raw.company.clone(),
        description: raw.description.clone(),
        remote_type: RemoteType::infer(&location),
        location,
        skills_required: split_tags(&raw.tags),
        posted_date: dates::parse_utc(&raw.posted),
        source_url: raw.url.clone(),
        source_platform: source.to_string(),
        salary_range: SalaryRange::new(raw.salary_min, raw.salary_max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn raw() -> RawJob {
        RawJob {
            company: "TechCorp Inc.".into(),
            title: "Software Engineer".into(),
            location: "Remote".into(),
            tags: "python; remote".into(),
            description: "Build scalable web applications.".into(),
            url: "https://remoteok.com/remote-jobs/123456".into(),
            salary_min: Some(70_000.0),
            salary_max: Some(110_000.0),
            posted: "2024-01-15T10:00:00Z".into(),
            id: "123456".into(),
        }
    }

    #[test]
    fn mapper_produces_the_composite_external_id() {
        let posting = to_canonical(&raw(), "RemoteOK");
        assert_eq!(posting.external_id, "RemoteOK_123456");
        assert_eq!(posting.source_platform, "RemoteOK");
    }

    #[test]
    fn tags_split_into_skills() {
        let posting = to_canonical(&raw(), "RemoteOK");
        assert_eq!(posting.skills_required, vec!["python", "remote"]);
        assert_eq!(split_tags("a,b; c ;; ,"), vec!["a", "b", "c"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn posted_date_normalizes_to_utc() {
        let posting = to_canonical(&raw(), "RemoteOK");
        assert_eq!(
            posting.posted_date,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).single()
        );

        let mut undated = raw();
        undated.posted = "N/A".into();
        assert_eq!(to_canonical(&undated, "RemoteOK").posted_date, None);
    }

    #[test]
    fn missing_ids_synthesize_unique_external_ids() {
        let mut anon = raw();
        anon.id = String::new();
        let a = to_canonical(&anon, "SerpAPI");
        let b = to_canonical(&anon, "SerpAPI");
        assert!(a.external_id.starts_with("SerpAPI_"));
        assert!(b.external_id.starts_with("SerpAPI_"));
        assert_ne!(a.external_id, b.external_id);
    }

    #[test]
    fn empty_location_defaults_to_remote_and_infers_remote_type() {
        let mut r = raw();
        r.location = String::new();
        let posting = to_canonical(&r, "Adzuna");
        assert_eq!(posting.location, "Remote");
        assert_eq!(posting.remote_type, RemoteType::Remote);

        r.location = "Austin, TX".into();
        assert_eq!(to_canonical(&r, "Adzuna").remote_type, RemoteType::Onsite);
    }

    #[test]
    fn mapper_never_emits_partial_documents() {
        let posting = to_canonical(&RawJob::default(), "Jobicy");
        assert!(posting.external_id.starts_with("Jobicy_"));
        assert_eq!(posting.title, "N/A");
        assert_eq!(posting.company, "N/A");
        assert_eq!(posting.location, "Remote");
        assert!(posting.skills_required.is_empty());
        assert_eq!(posting.posted_date, None);
        assert_eq!(posting.salary_range.currency, "USD");
    }
}

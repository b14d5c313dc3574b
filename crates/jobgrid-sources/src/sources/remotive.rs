//! Remotive remote jobs API. No authentication; the `salary` field is
//! a free-text string ("$120k - $160k", "$180k + bonus").

use async_trait::async_trait;
use jobgrid_core::RawJob;
use serde_json::Value as JsonValue;

use crate::{salary, spec, HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

use super::array_field;

static SPEC: SourceSpec = SourceSpec {
    source: "Remotive",
    company: &["company_name"],
    title: &["title"],
    location: &["candidate_required_location"],
    tags: &["tags"],
    description: &["description"],
    url: &["url"],
    salary_min: &["salary_min"],
    salary_max: &["salary_max"],
    posted: &["publication_date"],
    id: &["id"],
};

pub struct Remotive;

#[async_trait]
impl JobSource for Remotive {
    fn name(&self) -> &'static str {
        "Remotive"
    }

    fn spec(&self) -> &'static SourceSpec {
        &SPEC
    }

    async fn fetch_page(
        &self,
        http: &HttpClient,
        _creds: &SourceCredentials,
        query: &str,
        page: u32,
    ) -> Result<Vec<JsonValue>, SourceError> {
        if page > 1 {
            return Ok(Vec::new());
        }
        let body = http
            .get_json(
                "https://remotive.com/api/remote-jobs",
                &[("search", query), ("category", "software-dev")],
                &[],
            )
            .await?;
        Ok(array_field(&body, "jobs"))
    }

    fn fixup(&self, raw: &JsonValue, job: &mut RawJob) {
        if job.salary_min.is_none() && job.salary_max.is_none() {
            if let Some(text) = spec::lookup(raw, "salary").and_then(|v| v.as_str()) {
                let (min, max) = salary::parse_text(text);
                job.salary_min = min;
                job.salary_max = max;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remotive_shape_parses_salary_string() {
        let raw = json!({
            "id": 55231,
            "title": "Senior Software Engineer",
            "company_name": "Driftline",
            "candidate_required_location": "USA Only",
            "tags": ["python", "aws"],
            "description": "<p>Own our ingestion stack.</p>",
            "url": "https://remotive.com/remote-jobs/55231",
            "salary": "$120k - $160k",
            "publication_date": "2024-04-02T08:00:00",
        });
        let job = Remotive.extract(&raw);
        assert_eq!(job.location, "USA Only");
        assert_eq!(job.salary_min, Some(120_000.0));
        assert_eq!(job.salary_max, Some(160_000.0));
        assert_eq!(job.description, "Own our ingestion stack.");
    }

    #[test]
    fn single_value_salary_string_sets_both_bounds() {
        let raw = json!({
            "id": 2,
            "title": "Engineer",
            "salary": "$180k + bonus up to 100%",
        });
        let job = Remotive.extract(&raw);
        assert_eq!(job.salary_min, Some(180_000.0));
        assert_eq!(job.salary_max, Some(180_000.0));
    }
}

//! SerpAPI Google Jobs engine. Requires an API key; salary appears in
//! several optional places and is almost always free text.

use async_trait::async_trait;
use jobgrid_core::RawJob;
use serde_json::Value as JsonValue;

use crate::{clean, salary, spec, HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

use super::array_field;

static SPEC: SourceSpec = SourceSpec {
    source: "SerpAPI",
    company: &["company_name"],
    title: &["title"],
    location: &["location"],
    tags: &["job_highlights"],
    description: &["description", "snippet"],
    url: &["apply_options.0.link", "related_links.0.link", "link"],
    salary_min: &[],
    salary_max: &[],
    posted: &["detected_extensions.posted_at", "posted_at", "schedule_type"],
    id: &["job_id"],
};

/// Optional places the salary text shows up, tried in order.
const SALARY_TEXT_PATHS: &[&str] = &[
    "detected_extensions.salary",
    "salary",
    "compensation.base_salary.value.min_value",
];

pub struct SerpApi;

#[async_trait]
impl JobSource for SerpApi {
    fn name(&self) -> &'static str {
        "SerpAPI"
    }

    fn spec(&self) -> &'static SourceSpec {
        &SPEC
    }

    async fn fetch_page(
        &self,
        http: &HttpClient,
        creds: &SourceCredentials,
        query: &str,
        page: u32,
    ) -> Result<Vec<JsonValue>, SourceError> {
        let api_key = creds.require(&creds.serpapi_api_key, "SERPAPI_API_KEY")?;
        // Google Jobs paginates by token, not page number; one page
        // per query keeps the loop bounded.
        if page > 1 {
            return Ok(Vec::new());
        }

        let body = http
            .get_json(
                "https://serpapi.com/search",
                &[
                    ("engine", "google_jobs"),
                    ("q", query),
                    ("location", "United States"),
                    ("google_domain", "google.com"),
                    ("hl", "en"),
                    ("gl", "us"),
                    ("api_key", api_key),
                ],
                &[],
            )
            .await?;
        Ok(array_field(&body, "jobs_results"))
    }

    fn fixup(&self, raw: &JsonValue, job: &mut RawJob) {
        for path in SALARY_TEXT_PATHS {
            let Some(value) = spec::lookup(raw, path) else {
                continue;
            };
            let text = clean::coerce_text(value);
            let (min, max) = salary::parse_text(&text);
            if min.is_some() || max.is_some() {
                job.salary_min = min;
                job.salary_max = max;
                break;
            }
        }
        // Fall back to the title as a stable-enough key; the mapper
        // synthesizes an id only when this is empty too.
        if job.id.is_empty() {
            job.id = job.title.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serpapi_shape_walks_nested_urls_and_salary() {
        let raw = json!({
            "job_id": "eyJqb2JfdGl0bGUi",
            "title": "Software Engineer",
            "company_name": "Lumon",
            "location": "Austin, TX",
            "description": "Refinement of macro data files.",
            "apply_options": [{"link": "https://careers.lumon.example/apply"}],
            "detected_extensions": {"salary": "$100k - $150k", "posted_at": "3 days ago"},
            "job_highlights": [{"title": "Qualifications"}, {"title": "Benefits"}],
        });
        let job = SerpApi.extract(&raw);
        assert_eq!(job.url, "https://careers.lumon.example/apply");
        assert_eq!(job.salary_min, Some(100_000.0));
        assert_eq!(job.salary_max, Some(150_000.0));
        assert_eq!(job.tags, "Qualifications; Benefits");
        assert_eq!(job.posted, "3 days ago");
        assert_eq!(job.id, "eyJqb2JfdGl0bGUi");
    }

    #[test]
    fn missing_job_id_falls_back_to_title() {
        let raw = json!({"title": "Platform Engineer", "company_name": "X"});
        assert_eq!(SerpApi.extract(&raw).id, "Platform Engineer");
    }

    #[test]
    fn related_link_is_second_url_choice() {
        let raw = json!({
            "title": "SWE",
            "related_links": [{"link": "https://jobs.example/related"}],
        });
        assert_eq!(SerpApi.extract(&raw).url, "https://jobs.example/related");
    }
}

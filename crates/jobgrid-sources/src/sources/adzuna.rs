//! Adzuna job search API. Requires both an app id and an app key,
//! passed as query parameters; the page number goes in the URL path.

use async_trait::async_trait;
use jobgrid_core::RawJob;
use serde_json::Value as JsonValue;

use crate::{HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

const RESULTS_PER_PAGE: u32 = 50;

static SPEC: SourceSpec = SourceSpec {
    source: "Adzuna",
    company: &["company.display_name", "company"],
    title: &["title"],
    location: &["location.display_name"],
    tags: &["tags"],
    description: &["description"],
    url: &["redirect_url", "url"],
    salary_min: &["salary_min"],
    salary_max: &["salary_max"],
    posted: &["created"],
    id: &["id"],
};

pub struct Adzuna;

#[async_trait]
impl JobSource for Adzuna {
    fn name(&self) -> &'static str {
        "Adzuna"
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
        let app_id = creds.require(&creds.adzuna_app_id, "ADZUNA_APP_ID")?;
        let app_key = creds.require(&creds.adzuna_api_key, "ADZUNA_API_KEY")?;

        let url = format!("https://api.adzuna.com/v1/api/jobs/us/search/{page}");
        let per_page = RESULTS_PER_PAGE.to_string();
        let body = http
            .get_json(
                &url,
                &[
                    ("app_id", app_id),
                    ("app_key", app_key),
                    ("results_per_page", &per_page),
                    ("what", query),
                ],
                &[],
            )
            .await?;

        Ok(super::array_field(&body, "results"))
    }

    fn fixup(&self, _raw: &JsonValue, job: &mut RawJob) {
        // Adzuna rarely supplies tags; derive a few from the title.
        if job.tags.is_empty() {
            let slug = job.title.to_lowercase().replace(' ', "-");
            let derived: Vec<&str> = ["software-engineer", "remote", "full-time"]
                .into_iter()
                .filter(|tag| slug.contains(tag))
                .collect();
            job.tags = derived.join("; ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn adzuna_shape_extracts_nested_names() {
        let raw = json!({
            "id": 4321,
            "title": "Software Engineer II",
            "company": {"display_name": "Acme"},
            "location": {"display_name": "Remote"},
            "description": "<p>Ship backend services.</p>",
            "redirect_url": "https://adzuna.example/4321",
            "salary_min": 95000,
            "salary_max": 130000,
            "created": "2024-01-15T10:00:00Z",
        });
        let job = Adzuna.extract(&raw);
        assert_eq!(job.company, "Acme");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.title, "Software Engineer II");
        assert_eq!(job.description, "Ship backend services.");
        assert_eq!(job.url, "https://adzuna.example/4321");
        assert_eq!(job.salary_min, Some(95_000.0));
        assert_eq!(job.salary_max, Some(130_000.0));
        assert_eq!(job.posted, "2024-01-15T10:00:00Z");
        assert_eq!(job.id, "4321");
    }

    #[test]
    fn tags_are_derived_from_the_title_when_absent() {
        let raw = json!({"title": "Remote Software Engineer", "id": 1});
        let job = Adzuna.extract(&raw);
        assert_eq!(job.tags, "software-engineer; remote");
    }

    #[tokio::test]
    async fn fetch_without_credentials_names_the_variable() {
        let http = HttpClient::with_defaults().unwrap();
        let err = Adzuna
            .fetch_page(&http, &SourceCredentials::default(), "Software Engineer", 1)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ADZUNA_APP_ID"));
    }
}

//! Arbeitnow job board API. No authentication; paginated with a
//! `page` query parameter.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::{HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

use super::array_field;

static SPEC: SourceSpec = SourceSpec {
    source: "Arbeitnow",
    company: &["company_name"],
    title: &["title"],
    location: &["location"],
    tags: &["tags"],
    description: &["description"],
    url: &["url"],
    salary_min: &["salary_min"],
    salary_max: &["salary_max"],
    posted: &["published_at", "created_at"],
    id: &["id", "slug"],
};

pub struct Arbeitnow;

#[async_trait]
impl JobSource for Arbeitnow {
    fn name(&self) -> &'static str {
        "Arbeitnow"
    }

    fn spec(&self) -> &'static SourceSpec {
        &SPEC
    }

    async fn fetch_page(
        &self,
        http: &HttpClient,
        _creds: &SourceCredentials,
        _query: &str,
        page: u32,
    ) -> Result<Vec<JsonValue>, SourceError> {
        let page = page.to_string();
        let body = http
            .get_json(
                "https://www.arbeitnow.com/api/job-board-api",
                &[("page", &page)],
                &[],
            )
            .await?;
        Ok(array_field(&body, "data"))
    }
}

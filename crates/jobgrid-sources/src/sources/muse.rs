//! The Muse public jobs API. An API key is optional; results are
//! filtered client-side by the query because the API has no free-text
//! search parameter.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::{HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

use super::array_field;

static SPEC: SourceSpec = SourceSpec {
    source: "TheMuse",
    company: &["company.name"],
    title: &["name"],
    location: &["locations.0.name"],
    tags: &["categories", "levels"],
    description: &["contents"],
    url: &["refs.landing_page"],
    salary_min: &[],
    salary_max: &[],
    posted: &["publication_date"],
    id: &["id"],
};

pub struct TheMuse;

#[async_trait]
impl JobSource for TheMuse {
    fn name(&self) -> &'static str {
        "TheMuse"
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
        let page = page.to_string();
        let mut params: Vec<(&str, &str)> = vec![("page", &page)];
        if let Some(key) = creds.muse_api_key.as_deref().filter(|k| !k.is_empty()) {
            params.push(("api_key", key));
        }

        let body = http
            .get_json("https://www.themuse.com/api/public/jobs", &params, &[])
            .await?;

        let needle = query.to_lowercase();
        Ok(array_field(&body, "results")
            .into_iter()
            .filter(|job| {
                job.get("name")
                    .and_then(|v| v.as_str())
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn muse_shape_collects_category_and_level_names() {
        let raw = json!({
            "id": 777,
            "name": "Data Engineer",
            "company": {"name": "Northwind"},
            "locations": [{"name": "New York, NY"}, {"name": "Boston, MA"}],
            "categories": [{"name": "Engineering"}],
            "levels": [{"name": "Mid Level"}],
            "contents": "<p>Pipelines &amp; warehouses.</p>",
            "refs": {"landing_page": "https://www.themuse.com/jobs/777"},
            "publication_date": "2024-02-20T16:41:00Z",
        });
        let job = TheMuse.extract(&raw);
        assert_eq!(job.company, "Northwind");
        assert_eq!(job.location, "New York, NY");
        assert_eq!(job.tags, "Engineering; Mid Level");
        assert_eq!(job.url, "https://www.themuse.com/jobs/777");
        assert_eq!(job.salary_min, None);
    }

    #[test]
    fn missing_locations_default_to_remote() {
        let raw = json!({"id": 1, "name": "Engineer", "company": {"name": "X"}});
        assert_eq!(TheMuse.extract(&raw).location, "Remote");
    }
}

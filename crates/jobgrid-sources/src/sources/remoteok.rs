//! RemoteOK API. No authentication and no pagination: one call
//! returns the whole feed, whose first entry is a legal notice rather
//! than a job. Salary is often only present inside the description.

use async_trait::async_trait;
use jobgrid_core::RawJob;
use serde_json::Value as JsonValue;

use crate::{salary, HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

static SPEC: SourceSpec = SourceSpec {
    source: "RemoteOK",
    company: &["company"],
    title: &["position"],
    location: &["location"],
    tags: &["tags"],
    description: &["description"],
    url: &["url"],
    salary_min: &["salary_min"],
    salary_max: &["salary_max"],
    posted: &["date"],
    id: &["id"],
};

pub struct RemoteOk;

#[async_trait]
impl JobSource for RemoteOk {
    fn name(&self) -> &'static str {
        "RemoteOK"
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
            .get_json("https://remoteok.com/api", &[], &[])
            .await?;

        let needle = query.to_lowercase();
        let jobs = body
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            // The feed interleaves metadata entries; real jobs carry a
            // `position` key.
            .filter(|entry| entry.get("position").is_some())
            .filter(|entry| {
                entry
                    .get("position")
                    .and_then(|v| v.as_str())
                    .map(|position| position.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect();
        Ok(jobs)
    }

    fn fixup(&self, _raw: &JsonValue, job: &mut RawJob) {
        if job.salary_min.is_none() && job.salary_max.is_none() {
            let (min, max) = salary::parse_text(&job.description);
            job.salary_min = min;
            job.salary_max = max;
        }
    }
}

//! Jobicy remote jobs API. No authentication; one `tag`-filtered call
//! per query with no pagination.

use async_trait::async_trait;
use jobgrid_core::{RawJob, DEFAULT_LOCATION};
use serde_json::Value as JsonValue;

use crate::{spec, HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

use super::array_field;

const COUNT_PER_TAG: u32 = 50;

static SPEC: SourceSpec = SourceSpec {
    source: "Jobicy",
    company: &["companyName"],
    title: &["jobTitle"],
    location: &["jobGeo"],
    tags: &["jobIndustry", "jobType"],
    description: &["jobDescription", "jobExcerpt"],
    url: &["url"],
    salary_min: &["salaryMin"],
    salary_max: &["salaryMax"],
    posted: &["pubDate"],
    id: &["id"],
};

pub struct Jobicy;

#[async_trait]
impl JobSource for Jobicy {
    fn name(&self) -> &'static str {
        "Jobicy"
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
        let count = COUNT_PER_TAG.to_string();
        let body = http
            .get_json(
                "https://jobicy.com/api/v2/remote-jobs",
                &[("tag", query), ("count", &count)],
                // Jobicy sits behind bot protection; a browser-ish
                // accept header keeps the JSON endpoint reachable.
                &[("Accept", "application/json, text/plain, */*")],
            )
            .await?;
        Ok(array_field(&body, "jobs"))
    }

    fn fixup(&self, raw: &JsonValue, job: &mut RawJob) {
        // "Anywhere" is Jobicy's label for unrestricted remote.
        if job.location.is_empty() || job.location == "Anywhere" {
            job.location = DEFAULT_LOCATION.to_string();
        }
        // jobLevel joins the tags unless it is the "Any" placeholder.
        if let Some(level) = spec::lookup(raw, "jobLevel").and_then(|v| v.as_str()) {
            if !level.is_empty() && level != "Any" {
                if job.tags.is_empty() {
                    job.tags = level.to_string();
                } else {
                    job.tags = format!("{}; {}", job.tags, level);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn jobicy_shape_merges_industry_type_and_level_tags() {
        let raw = json!({
            "id": 99001,
            "jobTitle": "Platform Engineer",
            "companyName": "Skylift",
            "jobGeo": "Anywhere",
            "jobIndustry": ["DevOps & SysAdmin"],
            "jobType": ["full-time"],
            "jobLevel": "Senior",
            "jobDescription": "<div>Run our fleet.</div>",
            "url": "https://jobicy.com/jobs/99001",
            "salaryMin": 110000,
            "salaryMax": 150000,
            "pubDate": "2024-03-07 09:12:41",
        });
        let job = Jobicy.extract(&raw);
        assert_eq!(job.location, "Remote");
        assert_eq!(job.tags, "DevOps & SysAdmin; full-time; Senior");
        assert_eq!(job.salary_min, Some(110_000.0));
        assert_eq!(job.description, "Run our fleet.");
    }

    #[test]
    fn any_level_placeholder_is_not_a_tag() {
        let raw = json!({
            "jobTitle": "QA Analyst",
            "jobType": ["contract"],
            "jobLevel": "Any",
        });
        assert_eq!(Jobicy.extract(&raw).tags, "contract");
    }
}

//! USAJobs federal search API. Requires an Authorization-Key header
//! plus a contact User-Agent; every useful field is nested under
//! `MatchedObjectDescriptor`.

use async_trait::async_trait;
use jobgrid_core::RawJob;
use serde_json::Value as JsonValue;

use crate::{clean, spec, HttpClient, JobSource, SourceCredentials, SourceError, SourceSpec};

const DEFAULT_CONTACT: &str = "jobgrid-ingest@example.com";

static SPEC: SourceSpec = SourceSpec {
    source: "USAJobs",
    company: &["MatchedObjectDescriptor.OrganizationName"],
    title: &["MatchedObjectDescriptor.PositionTitle"],
    location: &[
        "MatchedObjectDescriptor.PositionLocation.0.LocationName",
        "MatchedObjectDescriptor.PositionLocationDisplay",
    ],
    tags: &[],
    description: &["MatchedObjectDescriptor.PositionFormattedDescription.0.Content"],
    url: &[
        "MatchedObjectDescriptor.ApplyURI.0",
        "MatchedObjectDescriptor.PositionURI",
    ],
    salary_min: &["MatchedObjectDescriptor.PositionRemuneration.0.MinimumRange"],
    salary_max: &["MatchedObjectDescriptor.PositionRemuneration.0.MaximumRange"],
    posted: &["MatchedObjectDescriptor.PublicationStartDate"],
    id: &["MatchedObjectId", "MatchedObjectDescriptor.PositionID"],
};

pub struct UsaJobs;

#[async_trait]
impl JobSource for UsaJobs {
    fn name(&self) -> &'static str {
        "USAJobs"
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
        let api_key = creds.require(&creds.usajobs_api_key, "USAJOBS_API_KEY")?;
        let contact = creds
            .usajobs_user_agent
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTACT);

        let page = page.to_string();
        let body = http
            .get_json(
                "https://data.usajobs.gov/api/Search",
                &[("Keyword", query), ("Page", &page)],
                &[
                    ("Host", "data.usajobs.gov"),
                    ("User-Agent", contact),
                    ("Authorization-Key", api_key),
                ],
            )
            .await?;

        Ok(spec::lookup(&body, "SearchResult.SearchResultItems")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default())
    }

    fn fixup(&self, raw: &JsonValue, job: &mut RawJob) {
        // The formatted description omits the recruiter summary; fold
        // it in when it adds new text.
        if let Some(summary) =
            spec::lookup(raw, "MatchedObjectDescriptor.UserArea.Details.JobSummary")
                .and_then(|v| v.as_str())
        {
            let summary = clean::clean_text(summary);
            if !summary.is_empty() && !job.description.contains(&summary) {
                if job.description.is_empty() || job.description == "N/A" {
                    job.description = summary;
                } else {
                    job.description = format!("{summary} {}", job.description);
                }
            }
        }

        let mut tags = vec!["government".to_string(), "federal".to_string()];
        let title = job.title.to_lowercase();
        if title.contains("software") && title.contains("engineer") {
            tags.push("software-engineering".to_string());
        }
        let remote_flag = spec::lookup(raw, "MatchedObjectDescriptor.UserArea.Details.RemoteIndicator")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if remote_flag || job.location.to_lowercase().contains("remote") {
            tags.push("remote".to_string());
        }
        if spec::lookup(raw, "MatchedObjectDescriptor.UserArea.Details.TeleworkEligible")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            tags.push("telework".to_string());
        }
        job.tags = tags.join("; ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> JsonValue {
        json!({
            "MatchedObjectId": "712000000",
            "MatchedObjectDescriptor": {
                "PositionID": "AF-2024-0117",
                "PositionTitle": "Software Engineer",
                "OrganizationName": "Department of the Air Force",
                "PositionLocation": [{"LocationName": "Dayton, Ohio"}],
                "PositionLocationDisplay": "Multiple Locations",
                "PositionURI": "https://www.usajobs.gov/job/712000000",
                "ApplyURI": ["https://apply.usajobs.gov/712000000"],
                "PositionRemuneration": [{
                    "MinimumRange": "88520.0",
                    "MaximumRange": "115079.0",
                    "Description": "Per Year",
                }],
                "PositionFormattedDescription": [{"Content": "<p>Develop mission software.</p>"}],
                "PublicationStartDate": "2024-05-01",
                "UserArea": {
                    "Details": {
                        "JobSummary": "Serve as a software engineer.",
                        "TeleworkEligible": true,
                        "RemoteIndicator": false,
                    }
                }
            }
        })
    }

    #[test]
    fn usajobs_shape_resolves_descriptor_fields() {
        let job = UsaJobs.extract(&sample_item());
        assert_eq!(job.company, "Department of the Air Force");
        assert_eq!(job.title, "Software Engineer");
        assert_eq!(job.location, "Dayton, Ohio");
        assert_eq!(job.url, "https://apply.usajobs.gov/712000000");
        assert_eq!(job.salary_min, Some(88_520.0));
        assert_eq!(job.salary_max, Some(115_079.0));
        assert_eq!(job.id, "712000000");
        assert_eq!(job.posted, "2024-05-01");
    }

    #[test]
    fn summary_is_prepended_and_tags_synthesized() {
        let job = UsaJobs.extract(&sample_item());
        assert_eq!(
            job.description,
            "Serve as a software engineer. Develop mission software."
        );
        assert_eq!(
            job.tags,
            "government; federal; software-engineering; telework"
        );
    }

    #[test]
    fn location_display_is_the_fallback() {
        let mut item = sample_item();
        item["MatchedObjectDescriptor"]["PositionLocation"] = json!([]);
        let job = UsaJobs.extract(&item);
        assert_eq!(job.location, "Multiple Locations");
    }
}

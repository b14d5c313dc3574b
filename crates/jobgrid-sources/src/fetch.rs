//! Thin HTTP JSON fetch layer shared by the source fetchers.
//!
//! Deliberately minimal: one blocking-free GET with a timeout. Failed
//! pages are skipped by the ingest pipeline, so there is no retry or
//! backoff machinery here.

use std::time::Duration;

use serde_json::Value as JsonValue;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_USER_AGENT: &str = "jobgrid/0.1";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// GET a JSON document with optional query params and headers.
    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<JsonValue, FetchError> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_carry_the_final_url() {
        let err = FetchError::HttpStatus {
            status: 429,
            url: "https://api.example.test/jobs".into(),
        };
        assert_eq!(err.to_string(), "http status 429 for https://api.example.test/jobs");
    }
}

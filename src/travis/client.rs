//! Blocking client for the Travis CI v2 API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.travis-ci.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_V2: &str = "application/vnd.travis-ci.2+json";

/// Failures talking to the CI service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TravisError {
    #[error("invalid base URL '{0}'")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A repository and a summary of its last build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub github_language: Option<String>,
    #[serde(default)]
    pub last_build_id: Option<u64>,
    #[serde(default)]
    pub last_build_number: Option<String>,
    #[serde(default)]
    pub last_build_state: Option<String>,
    #[serde(default)]
    pub last_build_duration: Option<u64>,
    #[serde(default)]
    pub last_build_started_at: Option<String>,
    #[serde(default)]
    pub last_build_finished_at: Option<String>,
}

#[derive(Deserialize)]
struct RepoEnvelope {
    repo: Repo,
}

/// Source of repository status.
pub trait CiClient: Send + Sync {
    fn repo(&self, slug: &str) -> Result<Repo, TravisError>;
}

#[derive(Debug, Clone)]
pub struct TravisClient {
    client: Client,
    base_url: Url,
}

impl TravisClient {
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, TravisError> {
        let base_url =
            Url::parse(base_url).map_err(|_| TravisError::InvalidUrl(base_url.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V2));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("sivart/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn repo_url(&self, slug: &str) -> Result<Url, TravisError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TravisError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("repos");
            segments.extend(slug.split('/'));
        }
        Ok(url)
    }
}

impl CiClient for TravisClient {
    fn repo(&self, slug: &str) -> Result<Repo, TravisError> {
        let url = self.repo_url(slug)?;
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TravisError::Status(status));
        }

        let bytes = response.bytes()?;
        let envelope: RepoEnvelope = serde_json::from_slice(&bytes).map_err(TravisError::Decode)?;
        Ok(envelope.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> TravisClient {
        TravisClient::with_base_url(&server.base_url(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_fetches_repo() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/moggers87/sivart")
                .header("accept", ACCEPT_V2);
            then.status(200).json_body(json!({
                "repo": {
                    "id": 42,
                    "slug": "moggers87/sivart",
                    "description": "Travis, backwards",
                    "last_build_state": "passed",
                    "last_build_number": "17"
                }
            }));
        });

        let repo = client_for(&server).repo("moggers87/sivart").unwrap();

        mock.assert();
        assert_eq!(repo.id, 42);
        assert_eq!(repo.last_build_state.as_deref(), Some("passed"));
        assert_eq!(repo.github_language, None);
    }

    #[test]
    fn test_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/nobody/nothing");
            then.status(404);
        });

        let result = client_for(&server).repo("nobody/nothing");
        assert!(matches!(
            result,
            Err(TravisError::Status(status)) if status == StatusCode::NOT_FOUND
        ));
    }

    #[test]
    fn test_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/a/b");
            then.status(200).body("not json");
        });

        let result = client_for(&server).repo("a/b");
        assert!(matches!(result, Err(TravisError::Decode(_))));
    }

    #[test]
    fn test_timeout_is_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/slow/repo");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "repo": { "id": 1, "slug": "slow/repo" } }));
        });

        let client =
            TravisClient::with_base_url(&server.base_url(), Duration::from_millis(200)).unwrap();
        match client.repo("slow/repo") {
            Err(TravisError::Http(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            TravisClient::with_base_url("not a url", DEFAULT_TIMEOUT),
            Err(TravisError::InvalidUrl(_))
        ));
    }
}

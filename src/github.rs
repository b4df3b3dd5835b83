// GitHub repository existence probe.
// One metadata GET against the REST API before paying for a full ingestion.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Existence check seam, mockable in tests.
#[async_trait]
pub trait RepoProbe: Send + Sync {
    /// True only when the repository metadata endpoint answers with a success
    /// status. Non-success statuses and network-level failures both read as
    /// "cannot proceed"; this layer never distinguishes the two.
    async fn exists(&self, repo_url: &str) -> bool;
}

/// Rewrite a repository web URL into its REST metadata URL.
pub fn api_url_for(repo_url: &str) -> String {
    repo_url.replacen("github.com", "api.github.com/repos", 1)
}

/// Probe backed by the GitHub REST API, unauthenticated.
pub struct GithubProbe {
    client: Client,
}

impl GithubProbe {
    /// Build a probe with a bounded request timeout. No retries.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        // GitHub rejects requests without a user agent.
        headers.insert(USER_AGENT, HeaderValue::from_static("gitdigest"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn status_ok(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(%url, %error, "existence probe request failed");
                false
            }
        }
    }
}

#[async_trait]
impl RepoProbe for GithubProbe {
    async fn exists(&self, repo_url: &str) -> bool {
        self.status_ok(&api_url_for(repo_url)).await
    }
}

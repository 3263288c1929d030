//! GitHub Releases source for lintsync.
//!
//! Lists a repository's releases through the REST API and downloads release
//! assets over HTTPS. Set `GITHUB_TOKEN` (or `GH_TOKEN`) to raise the API
//! rate limit from 60 to 5000 requests per hour.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

use async_trait::async_trait;
use lintsync_versions::{Error, Release, ReleaseSource, Result, ToolSpec};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Largest page size the releases endpoint accepts.
pub const MAX_PER_PAGE: usize = 100;

const SOURCE_NAME: &str = "GitHub";
const USER_AGENT: &str = concat!("lintsync/", env!("CARGO_PKG_VERSION"));

/// Release entry from the API; every other field is ignored.
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
}

/// Token from `GITHUB_TOKEN`, falling back to `GH_TOKEN`. Empty values count
/// as unset.
#[must_use]
pub fn token_from_env() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|token| !token.is_empty())
}

/// [`ReleaseSource`] backed by GitHub Releases.
#[derive(Debug, Clone)]
pub struct GitHubReleaseSource {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GitHubReleaseSource {
    /// Create a source for `owner/repo` without authentication.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built,
    /// which happens when the TLS backend fails to initialize.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build().map_err(|e| {
            Error::config(
                format!("failed to create HTTP client: {e}"),
                "Check the system TLS configuration and proxy environment variables",
            )
        })?;
        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: None,
        })
    }

    /// Create a source for the repository of `tool`, authenticated with the
    /// token from the environment if one is set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn for_tool(tool: &ToolSpec) -> Result<Self> {
        Ok(Self::new(&tool.owner, &tool.repo)?.with_token(token_from_env()))
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set or clear the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Whether requests carry a bearer token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn releases_url(&self, per_page: usize, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/releases?per_page={per_page}&page={page}",
            self.api_base, self.owner, self.repo
        )
    }

    async fn fetch_page(&self, per_page: usize, page: usize) -> Result<Vec<GitHubRelease>> {
        let url = self.releases_url(per_page, page);
        debug!(%url, "Fetching GitHub releases page");

        let response = self
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::listing(SOURCE_NAME, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::listing(SOURCE_NAME, describe_status(status, &url)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::listing(SOURCE_NAME, format!("invalid releases response: {e}")))
    }
}

fn describe_status(status: StatusCode, url: &str) -> String {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            format!("HTTP {status} from {url} (rate limited? set GITHUB_TOKEN)")
        }
        _ => format!("HTTP {status} from {url}"),
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleaseSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    /// GitHub returns releases newest first, so the order is passed through.
    async fn list_latest_releases(&self, count: usize) -> Result<Vec<Release>> {
        let per_page = count.min(MAX_PER_PAGE);
        let mut releases = Vec::with_capacity(count);
        let mut page = 1;

        while releases.len() < count {
            let batch = self.fetch_page(per_page, page).await?;
            let exhausted = batch.len() < per_page;
            releases.extend(batch.into_iter().map(|r| Release::new(r.tag_name)));
            if exhausted {
                break;
            }
            page += 1;
        }

        releases.truncate(count);
        info!(
            owner = %self.owner,
            repo = %self.repo,
            count = releases.len(),
            "Listed GitHub releases"
        );
        Ok(releases)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(%url, "Downloading GitHub asset");

        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download(url, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(url, format!("HTTP {status}")));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| Error::download(url, format!("failed to read body: {e}")))
    }
}

//! Release source abstraction.
//!
//! This module defines the [`ReleaseSource`] trait that provider crates
//! implement to list releases and download release assets.
//!
//! # Architecture
//!
//! - [`ReleaseSource`] - the two operations the pipeline needs
//! - [`Release`] - the projection of a release the pipeline keeps
//! - [`StaticReleaseSource`] - in-memory source with canned data
//!
//! Provider crates implement `ReleaseSource`:
//! - `lintsync-releases` - GitHub Releases

use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A release as seen by the pipeline. Other release metadata is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Release tag (e.g. "v2.6.1")
    pub tag_name: String,
}

impl Release {
    /// Create a new release.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
        }
    }
}

/// A host that publishes tool releases.
///
/// # Ordering
///
/// [`list_latest_releases`](Self::list_latest_releases) must return releases
/// newest first. The pipeline does not re-sort: the first release that
/// survives processing becomes `DEFAULT_VERSION` in the generated file.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Human-readable name of this source, used in error messages.
    fn name(&self) -> &'static str;

    /// List at most `count` releases, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the releases cannot be listed. The pipeline
    /// treats this as fatal.
    async fn list_latest_releases(&self, count: usize) -> Result<Vec<Release>>;

    /// Download the bytes at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails. The pipeline skips the
    /// affected release.
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// In-memory [`ReleaseSource`] serving canned releases and assets.
///
/// Every URL passed to [`download`](ReleaseSource::download) is recorded, so
/// callers can check whether the network path was taken.
#[derive(Debug, Default)]
pub struct StaticReleaseSource {
    releases: Vec<Release>,
    assets: HashMap<String, Vec<u8>>,
    listing_error: Option<String>,
    download_error: Option<String>,
    downloads: Mutex<Vec<String>>,
}

impl StaticReleaseSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a release. Releases are listed in insertion order.
    #[must_use]
    pub fn with_release(mut self, tag: impl Into<String>) -> Self {
        self.releases.push(Release::new(tag));
        self
    }

    /// Serve `content` for `url`.
    #[must_use]
    pub fn with_asset(mut self, url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.assets.insert(url.into(), content.into());
        self
    }

    /// Make release listing fail with `message`.
    #[must_use]
    pub fn with_listing_error(mut self, message: impl Into<String>) -> Self {
        self.listing_error = Some(message.into());
        self
    }

    /// Make every download fail with `message`.
    #[must_use]
    pub fn with_download_error(mut self, message: impl Into<String>) -> Self {
        self.download_error = Some(message.into());
        self
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn downloaded_urls(&self) -> Vec<String> {
        self.downloads
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReleaseSource for StaticReleaseSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn list_latest_releases(&self, count: usize) -> Result<Vec<Release>> {
        if let Some(message) = &self.listing_error {
            return Err(Error::listing(self.name(), message.clone()));
        }
        Ok(self.releases.iter().take(count).cloned().collect())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        if let Ok(mut urls) = self.downloads.lock() {
            urls.push(url.to_string());
        }
        if let Some(message) = &self.download_error {
            return Err(Error::download(url, message.clone()));
        }
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| Error::download(url, "asset not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_up_to_count() {
        let source = StaticReleaseSource::new()
            .with_release("v3")
            .with_release("v2")
            .with_release("v1");

        let releases = source.list_latest_releases(2).await.unwrap();
        assert_eq!(releases, vec![Release::new("v3"), Release::new("v2")]);

        let all = source.list_latest_releases(10).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_listing_error() {
        let source = StaticReleaseSource::new().with_listing_error("API rate limit exceeded");
        let err = source.list_latest_releases(1).await.unwrap_err();
        assert!(err.to_string().contains("API rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_download_known_and_unknown_asset() {
        let source = StaticReleaseSource::new().with_asset("https://x/a.txt", b"abc".to_vec());

        assert_eq!(source.download("https://x/a.txt").await.unwrap(), b"abc");
        assert!(source.download("https://x/b.txt").await.is_err());
        assert_eq!(
            source.downloaded_urls(),
            vec!["https://x/a.txt".to_string(), "https://x/b.txt".to_string()]
        );
    }

    #[tokio::test]
    async fn test_download_error_overrides_assets() {
        let source = StaticReleaseSource::new()
            .with_asset("https://x/a.txt", b"abc".to_vec())
            .with_download_error("network timeout");
        let err = source.download("https://x/a.txt").await.unwrap_err();
        assert!(err.to_string().contains("network timeout"));
    }
}

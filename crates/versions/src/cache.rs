//! On-disk checksum manifest cache.
//!
//! One file per release tag, holding the raw manifest bytes:
//!
//! ```text
//! tools/update_versions/cache/checksums/
//!   v2.6.0.txt
//!   v2.6.1.txt
//! ```
//!
//! A cached file is trusted indefinitely. There is no index and no TTL.

use crate::source::ReleaseSource;
use crate::tool::ToolSpec;
use crate::{Error, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Directory of cached checksum manifests keyed by release tag.
#[derive(Debug, Clone)]
pub struct ChecksumCache {
    root: PathBuf,
}

impl ChecksumCache {
    /// Create a cache rooted at `root`. The directory is not created.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the cache file for `tag`: `{root}/{tag}.txt`.
    ///
    /// # Errors
    ///
    /// Returns a cache error if the tag is empty or would escape the cache
    /// directory.
    pub fn path_for(&self, tag: &str) -> Result<PathBuf> {
        if tag.is_empty() || tag == "." || tag.contains(['/', '\\']) || tag.contains("..") {
            return Err(Error::cache(
                format!("tag {tag:?} cannot be used as a cache file name"),
                None,
            ));
        }
        Ok(self.root.join(format!("{tag}.txt")))
    }

    /// Load the cached manifest for `tag`, if present.
    ///
    /// # Errors
    ///
    /// Returns a cache error if the file exists but cannot be read.
    pub fn load(&self, tag: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(tag)?;
        if !path.is_file() {
            return Ok(None);
        }
        fs::read(&path).map(Some).map_err(|e| {
            Error::cache_with_source("failed to read cache file", Some(path), e)
        })
    }

    /// Store `content` as the manifest for `tag`.
    ///
    /// # Errors
    ///
    /// Returns a cache error if the file cannot be written.
    pub fn store(&self, tag: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(tag)?;
        fs::write(&path, content).map_err(|e| {
            Error::cache_with_source("failed to write cache file", Some(path.clone()), e)
        })?;
        Ok(path)
    }
}

/// Supplies manifest bytes for a tag, preferring the cache over the network.
pub struct ManifestResolver<'a, S: ReleaseSource + ?Sized> {
    source: &'a S,
    cache: &'a ChecksumCache,
    tool: &'a ToolSpec,
}

impl<'a, S: ReleaseSource + ?Sized> ManifestResolver<'a, S> {
    /// Create a resolver.
    #[must_use]
    pub const fn new(source: &'a S, cache: &'a ChecksumCache, tool: &'a ToolSpec) -> Self {
        Self {
            source,
            cache,
            tool,
        }
    }

    /// Manifest bytes for `tag`.
    ///
    /// On a cache hit the cached bytes are returned and the source is not
    /// contacted. On a miss the manifest is downloaded and written to the
    /// cache; a failed cache write is logged and the downloaded bytes are
    /// still returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot name a cache file, the cached
    /// file cannot be read, or the download fails.
    pub async fn resolve(&self, tag: &str) -> Result<Vec<u8>> {
        if let Some(content) = self.cache.load(tag)? {
            info!(tag, "Using cached checksum file");
            return Ok(content);
        }

        let url = self.tool.checksums_url(tag);
        info!(tag, %url, "Downloading checksum file");
        let content = self.source.download(&url).await?;

        match self.cache.store(tag, &content) {
            Ok(path) => debug!(tag, path = %path.display(), "Cached checksum file"),
            Err(e) => warn!(tag, error = %e, "Failed to save checksum file to cache"),
        }

        Ok(content)
    }
}

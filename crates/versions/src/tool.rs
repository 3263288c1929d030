//! Description of the tool whose releases are being tracked.

use serde::{Deserialize, Serialize};

/// Default tool tracked by lintsync.
pub const DEFAULT_TOOL: &str = "golangci-lint";
/// Default GitHub owner of [`DEFAULT_TOOL`].
pub const DEFAULT_OWNER: &str = "golangci";
/// Default GitHub repository of [`DEFAULT_TOOL`].
pub const DEFAULT_REPO: &str = "golangci-lint";
/// Default host that serves release downloads.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com";

/// Identifies a tool and where its releases are published.
///
/// The tool name is the fixed prefix of every archive in the checksum
/// manifest (`golangci-lint-2.6.1-linux-amd64.tar.gz`) and also names the
/// generated Starlark symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name as it appears in archive filenames
    pub name: String,
    /// Repository owner on the release host
    pub owner: String,
    /// Repository name on the release host
    pub repo: String,
    /// Base URL for release downloads, without trailing slash
    pub download_base: String,
}

impl Default for ToolSpec {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL, DEFAULT_OWNER, DEFAULT_REPO)
    }
}

impl ToolSpec {
    /// Creates a tool hosted on GitHub.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            repo: repo.into(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
        }
    }

    /// Overrides the download base URL.
    #[must_use]
    pub fn with_download_base(mut self, base: impl Into<String>) -> Self {
        self.download_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the checksum manifest published with `tag`.
    ///
    /// A single leading `v` is stripped from the tag for the filename
    /// segment: `v2.6.1` → `.../download/v2.6.1/golangci-lint-2.6.1-checksums.txt`.
    #[must_use]
    pub fn checksums_url(&self, tag: &str) -> String {
        let version = tag.strip_prefix('v').unwrap_or(tag);
        format!(
            "{}/{}/{}/releases/download/{}/{}-{}-checksums.txt",
            self.download_base, self.owner, self.repo, tag, self.name, version
        )
    }

    /// Tool name as a Starlark identifier fragment (`golangci-lint` → `golangci`).
    ///
    /// The generated symbols drop a trailing `-lint`/`_lint` and replace the
    /// remaining non-alphanumeric characters with underscores.
    #[must_use]
    pub fn symbol_stem(&self) -> String {
        let base = self
            .name
            .strip_suffix("-lint")
            .or_else(|| self.name.strip_suffix("_lint"))
            .unwrap_or(&self.name);
        base.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }
}

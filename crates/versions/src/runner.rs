//! End-to-end version sync.

use crate::aggregate::collect_versions;
use crate::cache::{ChecksumCache, ManifestResolver};
use crate::checksum::ChecksumParser;
use crate::render::{Renderer, prepare_template_data};
use crate::source::ReleaseSource;
use crate::tool::ToolSpec;
use crate::write::ensure_output_directory;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Default number of releases to process.
pub const DEFAULT_COUNT: usize = 10;
/// Default cache directory, relative to the workspace root.
pub const DEFAULT_CACHE_DIR: &str = "tools/update_versions/cache/checksums";
/// Default output file, relative to the workspace root.
pub const DEFAULT_OUTPUT_FILE: &str = "golangci_lint/private/versions.bzl";

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of releases to process
    pub count: usize,
    /// Cache directory; relative paths resolve against `workspace_root`
    pub cache_dir: PathBuf,
    /// Output file; relative paths resolve against `workspace_root`
    pub output_file: PathBuf,
    /// Workspace root
    pub workspace_root: PathBuf,
    /// Tool whose releases are tracked
    pub tool: ToolSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            workspace_root: PathBuf::from("."),
            tool: ToolSpec::default(),
        }
    }
}

impl Config {
    /// Absolute cache directory and output file.
    #[must_use]
    pub fn resolve_paths(&self) -> (PathBuf, PathBuf) {
        (
            resolve_against(&self.workspace_root, &self.cache_dir),
            resolve_against(&self.workspace_root, &self.output_file),
        )
    }

    /// Check settings that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `count` is zero or the tool name is
    /// empty.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::config(
                "count must be at least 1",
                "Pass --count with a positive number of releases",
            ));
        }
        if self.tool.name.is_empty() {
            return Err(Error::config(
                "tool name must not be empty",
                "Set the tool name used as the archive filename prefix",
            ));
        }
        Ok(())
    }
}

/// `path` if absolute, otherwise `root/path`.
#[must_use]
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Tags written to the artifact, in order
    pub versions: Vec<String>,
    /// Tag written as `DEFAULT_VERSION`
    pub default_version: String,
    /// Absolute path of the written artifact
    pub output_file: PathBuf,
}

/// Owns one sync run: listing, aggregation and rendering.
pub struct Runner<S> {
    config: Config,
    source: S,
    renderer: Renderer,
}

impl<S: ReleaseSource> Runner<S> {
    /// Create a runner that renders with the Starlark template for the
    /// configured tool.
    #[must_use]
    pub fn new(config: Config, source: S) -> Self {
        let renderer = Renderer::starlark(&config.tool);
        Self {
            config,
            source,
            renderer,
        }
    }

    /// Replace the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Release source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Execute the sync.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, when a directory cannot be created,
    /// when releases cannot be listed, when no release could be processed,
    /// or when the artifact cannot be written.
    #[instrument(name = "sync", skip(self), fields(tool = %self.config.tool.name))]
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;

        let (cache_dir, output_file) = self.config.resolve_paths();
        info!(
            workspace_root = %self.config.workspace_root.display(),
            count = self.config.count,
            cache_dir = %cache_dir.display(),
            output_file = %output_file.display(),
            "Starting version update"
        );

        fs::create_dir_all(&cache_dir)
            .map_err(|e| Error::io("create cache directory", &cache_dir, e))?;
        ensure_output_directory(&output_file)?;

        info!(source = self.source.name(), "Fetching releases");
        let releases = self
            .source
            .list_latest_releases(self.config.count)
            .await?;
        info!(count = releases.len(), "Found releases");

        let cache = ChecksumCache::new(&cache_dir);
        let resolver = ManifestResolver::new(&self.source, &cache, &self.config.tool);
        let parser = ChecksumParser::new(&self.config.tool.name)?;
        let versions = collect_versions(&releases, &resolver, &parser).await;

        if versions.is_empty() {
            return Err(Error::NoVersions);
        }
        info!(count = versions.len(), "Successfully processed versions");

        let data = prepare_template_data(&versions);
        self.renderer.write(&data, &output_file)?;

        info!(
            path = %output_file.display(),
            default_version = %data.default_version,
            "Generated versions file"
        );

        Ok(RunReport {
            versions: versions.into_iter().map(|v| v.tag).collect(),
            default_version: data.default_version,
            output_file,
        })
    }
}

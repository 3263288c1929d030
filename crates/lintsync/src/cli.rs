//! Command-line interface definition and error reporting.

use crate::tracing::{LogLevel, TracingFormat};
use clap::Parser;
use lintsync_releases::DEFAULT_API_BASE;
use lintsync_versions::runner::{DEFAULT_CACHE_DIR, DEFAULT_COUNT, DEFAULT_OUTPUT_FILE};
use lintsync_versions::tool::{DEFAULT_DOWNLOAD_BASE, DEFAULT_OWNER, DEFAULT_REPO, DEFAULT_TOOL};
use lintsync_versions::{Config, ToolSpec};
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Successful exit code
pub const EXIT_OK: i32 = 0;
/// Sync failure exit code
pub const EXIT_SYNC: i32 = 1;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;

/// Environment variable Bazel sets for `bazel run` targets.
pub const WORKSPACE_ENV: &str = "BUILD_WORKSPACE_DIRECTORY";

/// Errors surfaced by the CLI, each mapped to an exit code.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Invalid arguments or environment (exit code 2)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(lintsync::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// The sync itself failed (exit code 1)
    #[error("Version sync failed")]
    #[diagnostic(code(lintsync::cli::sync))]
    Sync {
        /// The pipeline error
        #[source]
        #[diagnostic_source]
        source: lintsync_versions::Error,
    },
}

impl CliError {
    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<lintsync_versions::Error> for CliError {
    fn from(err: lintsync_versions::Error) -> Self {
        match err {
            lintsync_versions::Error::Config { message, help } => Self::Config {
                message,
                help: Some(help),
            },
            source => Self::Sync { source },
        }
    }
}

/// Exit code for `err`.
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Sync { .. } => EXIT_SYNC,
    }
}

/// Refresh versions.bzl from upstream golangci-lint releases.
#[derive(Parser, Debug)]
#[command(name = "lintsync", version, long_about = None)]
pub struct Cli {
    /// Number of latest releases to process
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Checksum cache directory, relative to the workspace root unless absolute
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Output file, relative to the workspace root unless absolute
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Workspace root; defaults to the current directory
    #[arg(long, env = WORKSPACE_ENV)]
    pub workspace_root: Option<PathBuf>,

    /// Tool name as it appears in release archive filenames
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,

    /// GitHub owner of the tool repository
    #[arg(long, default_value = DEFAULT_OWNER)]
    pub owner: String,

    /// GitHub repository of the tool
    #[arg(long, default_value = DEFAULT_REPO)]
    pub repo: String,

    /// GitHub REST API base URL
    #[arg(long, env = "LINTSYNC_GITHUB_API", default_value = DEFAULT_API_BASE, hide = true)]
    pub api_base: String,

    /// Base URL for release asset downloads
    #[arg(long, env = "LINTSYNC_DOWNLOAD_BASE", default_value = DEFAULT_DOWNLOAD_BASE, hide = true)]
    pub download_base: String,

    /// Log level for lintsync crates (RUST_LOG overrides)
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: TracingFormat,
}

impl Cli {
    /// Parse arguments from the process command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Tool described by the flags.
    #[must_use]
    pub fn tool_spec(&self) -> ToolSpec {
        ToolSpec::new(&self.tool, &self.owner, &self.repo).with_download_base(&self.download_base)
    }

    /// Workspace root from the flag or environment, else the current directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the current directory cannot be
    /// determined.
    pub fn workspace_root(&self) -> Result<PathBuf, CliError> {
        match &self.workspace_root {
            Some(root) if !root.as_os_str().is_empty() => Ok(root.clone()),
            _ => std::env::current_dir().map_err(|e| {
                CliError::config_with_help(
                    format!("failed to determine current directory: {e}"),
                    format!("Pass --workspace-root or set {WORKSPACE_ENV}"),
                )
            }),
        }
    }

    /// Run configuration described by the flags.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the workspace root cannot be
    /// determined or the settings are invalid.
    pub fn to_config(&self) -> Result<Config, CliError> {
        let config = Config {
            count: self.count,
            cache_dir: self.cache_dir.clone(),
            output_file: self.output.clone(),
            workspace_root: self.workspace_root()?,
            tool: self.tool_spec(),
        };
        config.validate()?;
        Ok(config)
    }
}

//! Error types for the version synchronization pipeline.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing tool versions.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The release source could not list releases.
    #[error("Failed to fetch releases from {source_name}: {message}")]
    #[diagnostic(
        code(lintsync::versions::listing),
        help("Check network access and, for GitHub, the GITHUB_TOKEN rate limit")
    )]
    Listing {
        /// Name of the release source (e.g. "GitHub")
        source_name: String,
        /// The error message
        message: String,
    },

    /// A release asset could not be downloaded.
    #[error("Failed to download {url}: {message}")]
    #[diagnostic(code(lintsync::versions::download))]
    Download {
        /// The URL that was requested
        url: String,
        /// The error message
        message: String,
    },

    /// A checksum cache file could not be read or named.
    #[error("Checksum cache error: {message}")]
    #[diagnostic(
        code(lintsync::versions::cache),
        help("Delete the offending cache file to force a fresh download")
    )]
    Cache {
        /// The error message
        message: String,
        /// The cache file involved, if any
        path: Option<PathBuf>,
        /// The underlying source error
        #[source]
        source: Option<std::io::Error>,
    },

    /// A filename did not match the expected archive naming scheme.
    #[error("Filename does not match expected pattern: {filename}")]
    #[diagnostic(code(lintsync::versions::extract))]
    Extract {
        /// The filename that failed to match
        filename: String,
    },

    /// Every release failed resolution or parsing.
    #[error("No versions were successfully processed")]
    #[diagnostic(
        code(lintsync::versions::no_versions),
        help("Run with RUST_LOG=debug to see why each release was skipped")
    )]
    NoVersions,

    /// The artifact template failed to render.
    #[error("Failed to render {template} template: {message}")]
    #[diagnostic(code(lintsync::versions::render))]
    Render {
        /// Name of the template
        template: String,
        /// The error message
        message: String,
    },

    /// A filesystem operation on the output or cache directory failed.
    #[error("I/O error during {operation} on {}: {source}", path.display())]
    #[diagnostic(code(lintsync::versions::io))]
    Io {
        /// The operation being performed (e.g. "rename")
        operation: String,
        /// The path involved
        path: PathBuf,
        /// The underlying source error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(lintsync::versions::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },
}

impl Error {
    /// Create a new release listing error.
    #[must_use]
    pub fn listing(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listing {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a new download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Cache {
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a new cache error with source.
    #[must_use]
    pub fn cache_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Cache {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    /// Create a new filename extraction error.
    #[must_use]
    pub fn extract(filename: impl Into<String>) -> Self {
        Self::Extract {
            filename: filename.into(),
        }
    }

    /// Create a new render error.
    #[must_use]
    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error.
    #[must_use]
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }
}

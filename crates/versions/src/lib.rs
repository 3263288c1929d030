//! Release checksum sync for Bazel rules.
//!
//! This crate keeps a generated `versions.bzl` file in step with the
//! releases a tool publishes upstream. For each recent release it fetches the
//! `checksums.txt` manifest (or reuses a cached copy), extracts one SHA-256
//! per OS/architecture archive, and renders the collected data into a Starlark
//! dictionary that the rules use to pick and verify the right binary.
//!
//! # Architecture
//!
//! - [`source`] - the [`ReleaseSource`] seam and an in-memory implementation
//! - [`platform`] - OS/arch extraction from archive filenames
//! - [`checksum`] - manifest parsing
//! - [`cache`] - on-disk manifest cache and cache-or-download resolution
//! - [`aggregate`] - per-release processing with partial-failure tolerance
//! - [`render`] - template data and the Starlark template
//! - [`write`] - atomic file replacement
//! - [`runner`] - the end-to-end run
//!
//! # Example
//!
//! ```rust,ignore
//! use lintsync_versions::{Config, Runner, StaticReleaseSource};
//!
//! let runner = Runner::new(Config::default(), StaticReleaseSource::new());
//! let report = runner.run().await?;
//! println!("default version: {}", report.default_version);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod aggregate;
pub mod cache;
pub mod checksum;
pub mod error;
pub mod platform;
pub mod render;
pub mod runner;
pub mod source;
pub mod tool;
pub mod write;

pub use aggregate::collect_versions;
pub use cache::{ChecksumCache, ManifestResolver};
pub use checksum::{ChecksumParser, Checksums, Version, is_valid_sha256};
pub use error::{Error, Result};
pub use platform::{Platform, PlatformExtractor};
pub use render::{
    ArtifactTemplate, Renderer, StarlarkTemplate, TemplateData, VersionData, prepare_template_data,
};
pub use runner::{Config, RunReport, Runner};
pub use source::{Release, ReleaseSource, StaticReleaseSource};
pub use tool::ToolSpec;
pub use write::{ensure_output_directory, write_atomic};

//! Checksum manifest parsing.
//!
//! A manifest is the `sha256sum`-style text file published with each release:
//!
//! ```text
//! aee6e16af4dfa60dd3c4e39536edc905f28369fda3c138090db00c8233cfe450  golangci-lint-2.6.1-darwin-amd64.tar.gz
//! ```
//!
//! Lines that cannot be used are skipped rather than failing the manifest.

use crate::platform::{Platform, PlatformExtractor, is_archive};
use crate::Result;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Platform → hex SHA-256 mapping for one release.
pub type Checksums = HashMap<Platform, String>;

/// Length of a hex-encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// A release tag together with the checksums parsed from its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Release tag (e.g. "v2.6.1")
    pub tag: String,
    /// Checksums per platform
    pub checksums: Checksums,
}

impl Version {
    /// Create a new version.
    #[must_use]
    pub fn new(tag: impl Into<String>, checksums: Checksums) -> Self {
        Self {
            tag: tag.into(),
            checksums,
        }
    }
}

/// Returns true if `hash` is exactly 64 hex characters (either case).
#[must_use]
pub fn is_valid_sha256(hash: &str) -> bool {
    hash.len() == SHA256_HEX_LEN && hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses checksum manifests into [`Checksums`].
#[derive(Debug, Clone)]
pub struct ChecksumParser {
    extractor: PlatformExtractor,
}

impl ChecksumParser {
    /// Create a parser for manifests of `tool`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tool name is empty.
    pub fn new(tool: &str) -> Result<Self> {
        Ok(Self {
            extractor: PlatformExtractor::new(tool)?,
        })
    }

    /// Parse manifest bytes.
    ///
    /// Hashes are stored exactly as written; only validation is
    /// case-insensitive. Non-archive filenames are dropped without a
    /// warning. Malformed lines, invalid hashes and unrecognized archive
    /// names are dropped with a warning. Bytes that are not valid UTF-8
    /// are decoded lossily, so they only affect the line they sit on.
    #[must_use]
    pub fn parse(&self, content: &[u8]) -> Checksums {
        let mut checksums = Checksums::new();

        for raw in content.split(|b| *b == b'\n') {
            let line = String::from_utf8_lossy(raw);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // "<hash>  <filename>"
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                warn!(line, "Skipping malformed checksum line");
                continue;
            }
            let hash = fields[0];
            let filename = fields[fields.len() - 1];

            if !is_valid_sha256(hash) {
                warn!(line, "Skipping line with invalid SHA-256");
                continue;
            }

            if !is_archive(filename) {
                continue;
            }

            match self.extractor.extract(filename) {
                Ok(platform) => {
                    debug!(%platform, filename, "Parsed checksum");
                    checksums.insert(platform, hash.to_string());
                }
                Err(e) => warn!(filename, error = %e, "Skipping unrecognized archive"),
            }
        }

        checksums
    }
}

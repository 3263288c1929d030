//! Platform identification from release archive filenames.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system and architecture pair, taken verbatim from a filename.
///
/// Tokens are not canonicalized: `amd64` stays `amd64`, `armv6` stays `armv6`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system token (e.g. "linux", "darwin", "windows")
    pub os: String,
    /// Architecture token (e.g. "amd64", "arm64", "386")
    pub arch: String,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Archive suffixes that denote a platform binary.
pub const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".zip"];

/// Returns true if `filename` is a platform archive (`.tar.gz` or `.zip`).
#[must_use]
pub fn is_archive(filename: &str) -> bool {
    ARCHIVE_SUFFIXES.iter().any(|suffix| filename.ends_with(suffix))
}

/// Extracts a [`Platform`] from archive filenames of one tool.
///
/// Expected shape: `{tool}-{version}-{os}-{arch}.{tar.gz|zip}`, where the
/// version is one or more dot-separated digit groups. The whole filename must
/// match. OS and arch tokens are not checked against any whitelist.
#[derive(Debug, Clone)]
pub struct PlatformExtractor {
    pattern: Regex,
}

impl PlatformExtractor {
    /// Build an extractor for archives named after `tool`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tool name is empty.
    pub fn new(tool: &str) -> Result<Self> {
        if tool.is_empty() {
            return Err(Error::config(
                "tool name must not be empty",
                "Set the tool name used as the archive filename prefix",
            ));
        }
        let pattern = format!(
            r"^{}-\d+(?:\.\d+)*-(\w+)-(\w+)\.(?:tar\.gz|zip)$",
            regex::escape(tool)
        );
        let pattern = Regex::new(&pattern)
            .map_err(|e| Error::config(format!("invalid filename pattern: {e}"), "Check the tool name"))?;
        Ok(Self { pattern })
    }

    /// Extract OS and architecture from `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Extract`] if the filename does not match the
    /// expected shape.
    pub fn extract(&self, filename: &str) -> Result<Platform> {
        let captures = self
            .pattern
            .captures(filename)
            .ok_or_else(|| Error::extract(filename))?;
        Ok(Platform::new(&captures[1], &captures[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PlatformExtractor {
        PlatformExtractor::new("golangci-lint").unwrap()
    }

    #[test]
    fn test_extract_tar_gz() {
        let platform = extractor()
            .extract("golangci-lint-2.6.1-linux-amd64.tar.gz")
            .unwrap();
        assert_eq!(platform, Platform::new("linux", "amd64"));
    }

    #[test]
    fn test_extract_zip() {
        let platform = extractor()
            .extract("golangci-lint-2.6.1-windows-386.zip")
            .unwrap();
        assert_eq!(platform, Platform::new("windows", "386"));
    }

    #[test]
    fn test_extract_known_architectures() {
        let extractor = extractor();
        for arch in ["amd64", "arm64", "armv6", "armv7", "386", "ppc64le", "s390x"] {
            let filename = format!("golangci-lint-1.55.2-linux-{arch}.tar.gz");
            let platform = extractor.extract(&filename).unwrap();
            assert_eq!(platform.os, "linux");
            assert_eq!(platform.arch, arch);
        }
    }

    #[test]
    fn test_extract_accepts_unlisted_os() {
        let platform = extractor()
            .extract("golangci-lint-2.0.0-illumos-amd64.tar.gz")
            .unwrap();
        assert_eq!(platform.os, "illumos");
    }

    #[test]
    fn test_extract_single_group_version() {
        let platform = extractor()
            .extract("golangci-lint-2-darwin-arm64.tar.gz")
            .unwrap();
        assert_eq!(platform, Platform::new("darwin", "arm64"));
    }

    #[test]
    fn test_extract_rejects_other_tool() {
        let err = extractor()
            .extract("other-tool-2.6.1-linux-amd64.tar.gz")
            .unwrap_err();
        assert!(matches!(err, Error::Extract { .. }));
    }

    #[test]
    fn test_extract_rejects_missing_version() {
        assert!(extractor().extract("golangci-lint-linux-amd64.tar.gz").is_err());
    }

    #[test]
    fn test_extract_rejects_unsupported_extension() {
        assert!(extractor().extract("golangci-lint-2.6.1-linux-amd64.deb").is_err());
        assert!(extractor().extract("golangci-lint-2.6.1-linux-amd64.tar.xz").is_err());
    }

    #[test]
    fn test_extract_rejects_source_tarball() {
        assert!(extractor().extract("golangci-lint-2.6.1-source.tar.gz").is_err());
    }

    #[test]
    fn test_extract_is_anchored() {
        assert!(extractor()
            .extract("prefix-golangci-lint-2.6.1-linux-amd64.tar.gz")
            .is_err());
        assert!(extractor()
            .extract("golangci-lint-2.6.1-linux-amd64.tar.gz.sig")
            .is_err());
    }

    #[test]
    fn test_tool_name_is_escaped() {
        let extractor = PlatformExtractor::new("a.b").unwrap();
        assert!(extractor.extract("a.b-1.0-linux-amd64.zip").is_ok());
        assert!(extractor.extract("axb-1.0-linux-amd64.zip").is_err());
    }

    #[test]
    fn test_empty_tool_name_rejected() {
        assert!(PlatformExtractor::new("").is_err());
    }

    #[test]
    fn test_is_archive() {
        assert!(is_archive("x.tar.gz"));
        assert!(is_archive("x.zip"));
        assert!(!is_archive("x.deb"));
        assert!(!is_archive("x.rpm"));
        assert!(!is_archive("x.tar.gz.sig"));
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::new("darwin", "arm64").to_string(), "darwin-arm64");
    }
}

//! `versions.bzl` generation.
//!
//! [`prepare_template_data`] reshapes aggregated versions into
//! [`TemplateData`], an [`ArtifactTemplate`] turns that into text, and
//! [`Renderer`] writes the text atomically.
//!
//! Maps are iterated through [`sorted_os_keys`] and [`sorted_arch_keys`], so
//! the rendered dictionary does not depend on hash map ordering.

use crate::checksum::{Checksums, Version};
use crate::tool::ToolSpec;
use crate::write::write_atomic;
use crate::{Error, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Arch → hash for one OS.
pub type ArchChecksums = HashMap<String, String>;

/// OS → arch → hash for one version.
pub type ChecksumsByOs = HashMap<String, ArchChecksums>;

/// One version, reshaped for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionData {
    /// Release tag
    pub tag: String,
    /// Checksums grouped by OS, then architecture
    pub checksums_by_os: ChecksumsByOs,
}

/// Everything a template needs to produce the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    /// Generation time, RFC 3339 in UTC (`2025-11-02T10:04:05Z`)
    pub generated_at: String,
    /// Tag of the first version, or empty when there are none
    pub default_version: String,
    /// Versions in release-source order
    pub versions: Vec<VersionData>,
}

/// Build [`TemplateData`] from aggregated versions.
///
/// The first version becomes the default. The timestamp is taken now.
#[must_use]
pub fn prepare_template_data(versions: &[Version]) -> TemplateData {
    TemplateData {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        default_version: versions
            .first()
            .map(|v| v.tag.clone())
            .unwrap_or_default(),
        versions: versions
            .iter()
            .map(|v| VersionData {
                tag: v.tag.clone(),
                checksums_by_os: organize_by_os(&v.checksums),
            })
            .collect(),
    }
}

/// Group a flat platform map by OS.
#[must_use]
pub fn organize_by_os(checksums: &Checksums) -> ChecksumsByOs {
    let mut by_os = ChecksumsByOs::new();
    for (platform, hash) in checksums {
        by_os
            .entry(platform.os.clone())
            .or_default()
            .insert(platform.arch.clone(), hash.clone());
    }
    by_os
}

/// OS keys in ascending order.
#[must_use]
pub fn sorted_os_keys(by_os: &ChecksumsByOs) -> Vec<&str> {
    let mut keys: Vec<&str> = by_os.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

/// Architecture keys in ascending order.
#[must_use]
pub fn sorted_arch_keys(by_arch: &ArchChecksums) -> Vec<&str> {
    let mut keys: Vec<&str> = by_arch.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

/// A text format for the generated artifact.
pub trait ArtifactTemplate: Send + Sync {
    /// Template name, used in error messages.
    fn name(&self) -> &str;

    /// Write the artifact for `data` to `out`.
    ///
    /// # Errors
    ///
    /// Returns a render error if the output cannot be written.
    fn render(&self, data: &TemplateData, out: &mut dyn Write) -> Result<()>;
}

/// Starlark `versions.bzl` template.
///
/// Symbol names come from the tool: for `golangci-lint` the file defines
/// `DEFAULT_VERSION`, `GOLANGCI_VERSIONS` and `get_golangci_version_info`.
#[derive(Debug, Clone)]
pub struct StarlarkTemplate {
    tool_name: String,
    versions_symbol: String,
    accessor_symbol: String,
}

impl StarlarkTemplate {
    /// Marker placed on the first line of every generated file.
    pub const GENERATED_MARKER: &'static str = "# Code generated by lintsync. DO NOT EDIT.";

    /// Create a template for `tool`.
    #[must_use]
    pub fn new(tool: &ToolSpec) -> Self {
        let stem = tool.symbol_stem();
        Self {
            tool_name: tool.name.clone(),
            versions_symbol: format!("{}_VERSIONS", stem.to_ascii_uppercase()),
            accessor_symbol: format!("get_{stem}_version_info"),
        }
    }

    /// Name of the generated versions dictionary.
    #[must_use]
    pub fn versions_symbol(&self) -> &str {
        &self.versions_symbol
    }

    /// Name of the generated accessor function.
    #[must_use]
    pub fn accessor_symbol(&self) -> &str {
        &self.accessor_symbol
    }

    /// Render `data` to a string.
    #[must_use]
    pub fn generate(&self, data: &TemplateData) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", Self::GENERATED_MARKER);
        let _ = writeln!(out, "# Generated at: {}", data.generated_at);
        let _ = writeln!(
            out,
            "\"\"\"Known {} releases and their SHA-256 checksums per platform.\"\"\"",
            self.tool_name
        );
        out.push('\n');

        let _ = writeln!(out, "DEFAULT_VERSION = {}", quote(&data.default_version));
        out.push('\n');

        let _ = writeln!(out, "{} = {{", self.versions_symbol);
        for version in &data.versions {
            if version.checksums_by_os.is_empty() {
                let _ = writeln!(out, "    {}: {{}},", quote(&version.tag));
                continue;
            }
            let _ = writeln!(out, "    {}: {{", quote(&version.tag));
            for os in sorted_os_keys(&version.checksums_by_os) {
                let by_arch = &version.checksums_by_os[os];
                let _ = writeln!(out, "        {}: {{", quote(os));
                for arch in sorted_arch_keys(by_arch) {
                    let _ = writeln!(out, "            {}: {},", quote(arch), quote(&by_arch[arch]));
                }
                out.push_str("        },\n");
            }
            out.push_str("    },\n");
        }
        out.push_str("}\n\n");

        let tool = &self.tool_name;
        let versions = &self.versions_symbol;
        let _ = write!(
            out,
            r#"def {accessor}(version = None):
    """Returns the release tag and per-platform checksums for a {tool} version.

    Args:
        version: Release tag such as "v2.6.1". Defaults to DEFAULT_VERSION.

    Returns:
        A (version, checksums) tuple where checksums maps os -> arch -> sha256.
    """
    if version == None:
        version = DEFAULT_VERSION
    if version not in {versions}:
        fail("Unknown {tool} version: {{}}. Known versions: {{}}".format(
            version,
            ", ".join({versions}.keys()),
        ))
    return version, {versions}[version]
"#,
            accessor = self.accessor_symbol,
        );

        out
    }
}

impl ArtifactTemplate for StarlarkTemplate {
    fn name(&self) -> &str {
        "starlark"
    }

    fn render(&self, data: &TemplateData, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.generate(data).as_bytes())
            .map_err(|e| Error::render(self.name(), e.to_string()))
    }
}

/// Starlark string literal with quotes and backslashes escaped.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Renders [`TemplateData`] with an injected template.
pub struct Renderer {
    template: Box<dyn ArtifactTemplate>,
}

impl Renderer {
    /// Create a renderer around `template`.
    #[must_use]
    pub fn new(template: Box<dyn ArtifactTemplate>) -> Self {
        Self { template }
    }

    /// Create a renderer using [`StarlarkTemplate`] for `tool`.
    #[must_use]
    pub fn starlark(tool: &ToolSpec) -> Self {
        Self::new(Box::new(StarlarkTemplate::new(tool)))
    }

    /// Render `data` into memory.
    ///
    /// # Errors
    ///
    /// Returns a render error if the template fails or emits invalid UTF-8.
    pub fn render_to_string(&self, data: &TemplateData) -> Result<String> {
        let mut buf = Vec::new();
        self.template.render(data, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::render(self.template.name(), e.to_string()))
    }

    /// Render `data` and atomically replace `path` with the result.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or any file operation fails. The
    /// existing file at `path` is left untouched in that case.
    pub fn write(&self, data: &TemplateData, path: &Path) -> Result<()> {
        debug!(
            template = self.template.name(),
            path = %path.display(),
            versions = data.versions.len(),
            "Rendering artifact"
        );
        write_atomic(path, |out| self.template.render(data, out))
    }
}

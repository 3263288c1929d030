//! Collects per-release checksums across a list of releases.

use crate::cache::ManifestResolver;
use crate::checksum::{ChecksumParser, Version};
use crate::source::{Release, ReleaseSource};
use tracing::{info, warn};

/// Resolve and parse every release in order, skipping the ones whose
/// manifest cannot be obtained.
///
/// The returned versions keep the order of `releases`. A release whose
/// manifest parsed but matched no platform is still returned, with empty
/// checksums. Failures never abort the loop; an empty result is left for the
/// caller to judge.
pub async fn collect_versions<S>(
    releases: &[Release],
    resolver: &ManifestResolver<'_, S>,
    parser: &ChecksumParser,
) -> Vec<Version>
where
    S: ReleaseSource + ?Sized,
{
    let mut versions = Vec::with_capacity(releases.len());

    for release in releases {
        let tag = release.tag_name.as_str();
        if tag.is_empty() {
            warn!("Skipping release with empty tag name");
            continue;
        }

        info!(tag, "Processing version");

        let content = match resolver.resolve(tag).await {
            Ok(content) => content,
            Err(e) => {
                warn!(tag, error = %e, "Failed to get checksums, skipping");
                continue;
            }
        };

        let checksums = parser.parse(&content);

        if checksums.is_empty() {
            warn!(tag, "No platform checksums found in manifest");
        } else {
            info!(tag, platforms = checksums.len(), "Found platform checksums");
        }

        versions.push(Version::new(tag, checksums));
    }

    versions
}

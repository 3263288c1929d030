//! lintsync command-line application.
//!
//! Wires the GitHub release source into the version sync runner. Usually run
//! through Bazel, which sets `BUILD_WORKSPACE_DIRECTORY`:
//!
//! ```text
//! bazel run //tools/update_versions -- --count 5
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cli;
pub mod tracing;

use crate::cli::{Cli, CliError};
use lintsync_releases::GitHubReleaseSource;
use lintsync_versions::{RunReport, Runner};

/// Run the sync described by `cli`.
///
/// # Errors
///
/// Returns a configuration error for invalid flags and a sync error for any
/// fatal pipeline failure.
pub async fn run(cli: &Cli) -> Result<RunReport, CliError> {
    let config = cli.to_config()?;

    let source = GitHubReleaseSource::for_tool(&config.tool)?.with_api_base(&cli.api_base);
    if !source.is_authenticated() {
        ::tracing::debug!("No GITHUB_TOKEN or GH_TOKEN set; using unauthenticated API requests");
    }

    let report = Runner::new(config, source).run().await?;
    Ok(report)
}

//! End-to-end tests for the version sync pipeline.
//!
//! Every test runs a real [`Runner`] against a [`StaticReleaseSource`] and a
//! temporary workspace, then inspects the cache directory and the generated
//! `versions.bzl`.

use lintsync_versions::{Config, Error, Runner, StaticReleaseSource, ToolSpec};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DARWIN_AMD64: &str = "aaa1111111111111111111111111111111111111111111111111111111111111";
const LINUX_AMD64: &str = "bbb2222222222222222222222222222222222222222222222222222222222222";
const CACHED: &str = "ccc3333333333333333333333333333333333333333333333333333333333333";

fn config(workspace: &Path) -> Config {
    Config {
        count: 10,
        cache_dir: PathBuf::from("cache"),
        output_file: PathBuf::from("out/versions.bzl"),
        workspace_root: workspace.to_path_buf(),
        tool: ToolSpec::default(),
    }
}

fn url(tag: &str) -> String {
    ToolSpec::default().checksums_url(tag)
}

fn manifest(version: &str) -> String {
    format!(
        "{DARWIN_AMD64}  golangci-lint-{version}-darwin-amd64.tar.gz\n\
         {LINUX_AMD64}  golangci-lint-{version}-linux-amd64.tar.gz\n\
         {LINUX_AMD64}  golangci-lint-{version}-linux-amd64.deb\n"
    )
}

fn read_output(workspace: &Path) -> String {
    fs::read_to_string(workspace.join("out/versions.bzl")).unwrap()
}

#[tokio::test]
async fn test_single_version() {
    let workspace = TempDir::new().unwrap();
    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), manifest("2.6.1"));

    let runner = Runner::new(config(workspace.path()), source);
    let report = runner.run().await.unwrap();

    assert_eq!(report.versions, vec!["v2.6.1".to_string()]);
    assert_eq!(report.default_version, "v2.6.1");
    assert_eq!(report.output_file, workspace.path().join("out/versions.bzl"));

    assert!(workspace.path().join("cache/v2.6.1.txt").is_file());

    let content = read_output(workspace.path());
    assert!(content.contains("DEFAULT_VERSION = \"v2.6.1\""));
    assert!(content.contains("\"darwin\": {"));
    assert!(content.contains(&format!("\"amd64\": \"{LINUX_AMD64}\"")));
    assert!(!workspace.path().join("out/versions.bzl.tmp").exists());
}

#[tokio::test]
async fn test_multiple_versions_keep_source_order() {
    let workspace = TempDir::new().unwrap();
    let tags = ["v2.6.1", "v2.6.0", "v2.5.0"];
    let mut source = StaticReleaseSource::new();
    for tag in tags {
        source = source
            .with_release(tag)
            .with_asset(url(tag), manifest(tag.trim_start_matches('v')));
    }

    let report = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap();
    assert_eq!(report.versions, tags);

    let content = read_output(workspace.path());
    let positions: Vec<_> = tags
        .iter()
        .map(|tag| content.find(&format!("\"{tag}\": {{")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    for tag in tags {
        assert!(workspace.path().join(format!("cache/{tag}.txt")).is_file());
    }
}

#[tokio::test]
async fn test_stray_non_utf8_byte_keeps_release() {
    let workspace = TempDir::new().unwrap();
    let mut content =
        format!("{LINUX_AMD64}  golangci-lint-2.6.1-linux-amd64.tar.gz\n").into_bytes();
    content.extend_from_slice(b"# note: caf\xe9\n");
    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), content);

    let report = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap();
    assert_eq!(report.versions, vec!["v2.6.1".to_string()]);

    let output = read_output(workspace.path());
    assert!(output.contains("\"linux\": {"));
    assert!(output.contains(&format!("\"amd64\": \"{LINUX_AMD64}\"")));
}

#[tokio::test]
async fn test_count_limits_releases() {
    let workspace = TempDir::new().unwrap();
    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), manifest("2.6.1"))
        .with_release("v2.6.0")
        .with_asset(url("v2.6.0"), manifest("2.6.0"));

    let mut config = config(workspace.path());
    config.count = 1;
    let report = Runner::new(config, source).run().await.unwrap();
    assert_eq!(report.versions, vec!["v2.6.1".to_string()]);
}

#[tokio::test]
async fn test_cache_hit_never_downloads() {
    let workspace = TempDir::new().unwrap();
    let cache_dir = workspace.path().join("cache");
    fs::create_dir_all(&cache_dir).unwrap();
    fs::write(
        cache_dir.join("v2.6.1.txt"),
        format!("{CACHED}  golangci-lint-2.6.1-linux-amd64.tar.gz\n"),
    )
    .unwrap();

    // No asset registered: a download attempt would fail the release.
    let source = StaticReleaseSource::new().with_release("v2.6.1");
    let runner = Runner::new(config(workspace.path()), source);
    runner.run().await.unwrap();

    assert!(runner.source().downloaded_urls().is_empty());
    assert!(read_output(workspace.path()).contains(CACHED));
}

#[tokio::test]
async fn test_listing_error_is_fatal() {
    let workspace = TempDir::new().unwrap();
    let source = StaticReleaseSource::new().with_listing_error("API rate limit exceeded");

    let err = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Listing { .. }));
    assert!(err.to_string().contains("Failed to fetch releases"));
    assert!(!workspace.path().join("out/versions.bzl").exists());
}

#[tokio::test]
async fn test_all_downloads_failing_is_fatal() {
    let workspace = TempDir::new().unwrap();
    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_release("v2.6.0")
        .with_download_error("network timeout");

    let err = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoVersions));
    assert!(err.to_string().contains("No versions"));
    assert!(!workspace.path().join("out/versions.bzl").exists());
}

#[tokio::test]
async fn test_empty_release_list_is_fatal() {
    let workspace = TempDir::new().unwrap();
    let err = Runner::new(config(workspace.path()), StaticReleaseSource::new())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoVersions));
}

#[tokio::test]
async fn test_one_failed_download_drops_one_version() {
    let workspace = TempDir::new().unwrap();
    // v2.6.0 has no asset.
    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), manifest("2.6.1"))
        .with_release("v2.6.0")
        .with_release("v2.5.0")
        .with_asset(url("v2.5.0"), manifest("2.5.0"));

    let report = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap();

    assert_eq!(report.versions, vec!["v2.6.1".to_string(), "v2.5.0".to_string()]);
    let content = read_output(workspace.path());
    assert!(!content.contains("\"v2.6.0\""));
    assert!(!workspace.path().join("cache/v2.6.0.txt").exists());
}

#[tokio::test]
async fn test_malformed_latest_release_stays_default() {
    let workspace = TempDir::new().unwrap();
    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), "invalid checksum file\n")
        .with_release("v2.6.0")
        .with_asset(
            url("v2.6.0"),
            format!("{LINUX_AMD64}  golangci-lint-2.6.0-linux-amd64.tar.gz\n"),
        );

    let report = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap();
    assert_eq!(report.default_version, "v2.6.1");
    assert_eq!(report.versions.len(), 2);

    let content = read_output(workspace.path());
    assert!(content.contains("DEFAULT_VERSION = \"v2.6.1\""));
    assert!(content.contains("    \"v2.6.1\": {},\n"));
    assert!(content.contains("\"v2.6.0\": {"));
    assert_eq!(content.matches(LINUX_AMD64).count(), 1);
}

#[tokio::test]
async fn test_skips_empty_tag() {
    let workspace = TempDir::new().unwrap();
    let source = StaticReleaseSource::new()
        .with_release("")
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), manifest("2.6.1"));

    let report = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap();
    assert_eq!(report.versions, vec!["v2.6.1".to_string()]);
}

#[tokio::test]
async fn test_zero_count_is_rejected() {
    let workspace = TempDir::new().unwrap();
    let mut config = config(workspace.path());
    config.count = 0;

    let err = Runner::new(config, StaticReleaseSource::new())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[tokio::test]
async fn test_rerun_replaces_output() {
    let workspace = TempDir::new().unwrap();
    let output = workspace.path().join("out/versions.bzl");
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    fs::write(&output, "stale").unwrap();

    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), manifest("2.6.1"));
    Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("# Code generated by lintsync. DO NOT EDIT."));
    assert!(!output.with_file_name("versions.bzl.tmp").exists());
}

#[tokio::test]
async fn test_unwritable_cache_dir_is_fatal() {
    let workspace = TempDir::new().unwrap();
    // A regular file where the cache directory should go.
    fs::write(workspace.path().join("cache"), "").unwrap();

    let source = StaticReleaseSource::new()
        .with_release("v2.6.1")
        .with_asset(url("v2.6.1"), manifest("2.6.1"));
    let err = Runner::new(config(workspace.path()), source)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

//! Atomic file replacement.

use crate::{Error, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Temporary path used while writing `path`: the full filename plus `.tmp`.
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Create every missing parent directory of `path`.
///
/// # Errors
///
/// Returns an I/O error if a directory cannot be created.
pub fn ensure_output_directory(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(|e| Error::io("create output directory", parent, e))
}

/// Replace `path` with the bytes produced by `fill`.
///
/// `fill` streams into `<path>.tmp`; the temp file is flushed, synced and
/// closed, then renamed over `path`. If any step fails the temp file is
/// removed and `path` is left as it was.
///
/// # Errors
///
/// Returns the error from `fill`, or an I/O error naming the failed step.
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let tmp_path = temp_path(path);
    let result = write_then_rename(path, &tmp_path, fill);
    if result.is_err() {
        // Best effort; the temp file may never have been created.
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_then_rename<F>(path: &Path, tmp_path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let file = File::create(tmp_path).map_err(|e| Error::io("create", tmp_path, e))?;
    let mut writer = BufWriter::new(file);

    fill(&mut writer)?;

    let file = writer
        .into_inner()
        .map_err(|e| Error::io("flush", tmp_path, e.into_error()))?;
    file.sync_all().map_err(|e| Error::io("sync", tmp_path, e))?;
    drop(file);

    fs::rename(tmp_path, path).map_err(|e| Error::io("rename", path, e))?;
    debug!(path = %path.display(), "Replaced file atomically");
    Ok(())
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem helpers.
//!
//! ```text
//! ensure_dir()       tokio::fs::create_dir_all
//! recreate_dir()     remove_dir_all + create_dir_all
//! write_atomic()     NamedTempFile in the same dir + persist (rename)
//! read_trimmed()     None when missing or unreadable
//! make_executable()  chmod +x on POSIX, no-op on Windows
//! ```


use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tokio::fs;

use crate::error::{FsError, Result, RunnerError};

/// Creates `dir` and its parents if missing.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| RunnerError::from(FsError::io(dir, e)))?;
    Ok(())
}

/// Deletes `dir` with everything in it, then creates it empty.
///
/// # Errors
///
/// Returns an error if removal or creation fails.
pub async fn recreate_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(RunnerError::from(FsError::io(dir, e)).into()),
    }
    ensure_dir(dir).await
}

/// Replaces `path` with `contents` so readers see the old or the new file,
/// never a partial one.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or renamed.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(dir)
        .map_err(|e| RunnerError::from(FsError::io(dir, e)))?;
    temp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write temporary file in {}", dir.display()))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync temporary file in {}", dir.display()))?;
    temp.persist(path)
        .map_err(|e| RunnerError::from(FsError::io(path, e.error)))?;
    Ok(())
}

/// Reads a text file and trims surrounding whitespace.
pub async fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .await
        .ok()
        .map(|text| text.trim().to_string())
}

/// Grants execute permission to owner, group and others.
///
/// # Errors
///
/// Returns an error if the permissions cannot be read or changed.
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .await
        .map_err(|e| RunnerError::from(FsError::io(path, e)))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)
        .await
        .map_err(|e| RunnerError::from(FsError::io(path, e)))?;
    Ok(())
}

/// Grants execute permission. Windows has no execute bit.
///
/// # Errors
///
/// Never fails on Windows.
#[cfg(not(unix))]
#[allow(clippy::unused_async)]
pub async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

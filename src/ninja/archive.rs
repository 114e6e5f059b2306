// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Zip unpacking for downloaded tools.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{FsError, NetworkError, Result, RunnerError};

fn archive_error(archive: &Path, message: impl std::fmt::Display) -> RunnerError {
    RunnerError::from(NetworkError::Archive {
        archive: archive.display().to_string(),
        message: message.to_string(),
    })
}

/// Unpacks every entry of `archive` below `dest`, keeping unix modes.
///
/// Entries escaping `dest` are rejected.
pub(super) fn unpack_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| RunnerError::from(FsError::io(archive, e)))?;
    let mut zip =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(archive, e))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| archive_error(archive, e))?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| archive_error(archive, format!("unsafe entry name '{}'", entry.name())))?;
        let path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&path).map_err(|e| RunnerError::from(FsError::io(&path, e)))?;
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RunnerError::from(FsError::io(parent, e)))?;
        }
        let mut out = File::create(&path).map_err(|e| RunnerError::from(FsError::io(&path, e)))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| RunnerError::from(FsError::io(&path, e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&path, fs::Permissions::from_mode(mode))
                    .map_err(|e| RunnerError::from(FsError::io(&path, e)))?;
            }
        }
    }
    Ok(())
}

/// Finds a file called `name` in `dir` or its subdirectories.
pub(super) fn find_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let direct = dir.join(name);
    if direct.is_file() {
        return Some(direct);
    }
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    subdirs.into_iter().find_map(|sub| find_file(&sub, name))
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The last-built commit record kept inside the vcpkg root.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::git::Fingerprint;
use crate::git::fingerprint::record_text;
use crate::utility::fs::{read_trimmed, write_atomic};

/// File name of the record, relative to the vcpkg root.
pub const RECORD_FILE_NAME: &str = "vcpkg_last_built_commit_id";

/// Commit id the vcpkg executable was last built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    path: PathBuf,
}

impl BuildRecord {
    #[must_use]
    pub fn in_root(root: &Path) -> Self {
        Self {
            path: root.join(RECORD_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The recorded commit id. An absent or empty file is `None`.
    pub async fn read(&self) -> Option<String> {
        read_trimmed(&self.path).await.filter(|text| !text.is_empty())
    }

    /// Returns true if the executable must be rebuilt for `current`.
    pub async fn is_stale(&self, current: Option<&Fingerprint>) -> bool {
        let Some(last) = self.read().await else {
            info!(path = %self.path.display(), "no last built commit id, forcing a rebuild");
            return true;
        };
        debug!(last, current = record_text(current), "last build check");
        let stale = last != record_text(current);
        if stale {
            info!("vcpkg executable is out of date with sources");
        } else {
            info!("vcpkg executable is up to date with sources");
        }
        stale
    }

    /// Replaces the record with `fingerprint`, or an empty file if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn store(&self, fingerprint: Option<&Fingerprint>) -> Result<()> {
        write_atomic(&self.path, record_text(fingerprint))?;
        info!(
            commit = record_text(fingerprint),
            path = %self.path.display(),
            "stored last built commit id"
        );
        Ok(())
    }
}

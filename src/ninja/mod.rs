// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ninja locator.
//!
//! ```text
//! resolve_path(explicit, url)
//!   |
//!   +-- explicit non-empty ------------------------> explicit, verbatim
//!   |
//!   v
//! <cache>/<url key>/
//!   |
//!   +-- ninja[.exe] already extracted -------------> reuse
//!   |
//!   v
//! Downloader: url -> ninja.zip -> unpack -> chmod +x -> path
//! ```

mod archive;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tracing::{debug, info};

use crate::core::platform::Platform;
use crate::error::{NetworkError, Result, RunnerError};
use crate::net::{Downloader, ProgressDisplay};
use crate::utility::fs::{ensure_dir, make_executable};

/// Pinned Ninja release used when no URL is configured.
pub const DEFAULT_VERSION: &str = "v1.10.2";

/// Resolves the path of a build tool, downloading it if needed.
pub trait ToolLocator: Send + Sync {
    /// Returns `explicit` when given, otherwise a downloaded executable.
    fn resolve_path<'a>(
        &'a self,
        explicit: Option<&'a Path>,
        url: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PathBuf>>;
}

/// Release archive for `platform`.
#[must_use]
pub fn default_url(platform: Platform) -> String {
    let asset = match platform {
        Platform::Windows => "ninja-win.zip",
        Platform::MacOs => "ninja-mac.zip",
        Platform::Linux => "ninja-linux.zip",
    };
    format!("https://github.com/ninja-build/ninja/releases/download/{DEFAULT_VERSION}/{asset}")
}

/// Directory name a download URL is cached under.
#[must_use]
pub fn cache_key(url: &str) -> String {
    let key: String = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    key.trim_matches('_').to_string()
}

/// Downloads Ninja release archives into a cache directory.
#[derive(Debug, Clone)]
pub struct NinjaLocator {
    cache_root: PathBuf,
    platform: Platform,
    progress: ProgressDisplay,
}

impl NinjaLocator {
    #[must_use]
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            platform: Platform::current(),
            progress: ProgressDisplay::default(),
        }
    }

    #[must_use]
    pub const fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub const fn progress(mut self, progress: ProgressDisplay) -> Self {
        self.progress = progress;
        self
    }

    async fn download(&self, url: &str) -> Result<PathBuf> {
        let exe_name = self.platform.exe_name("ninja");
        let dir = self.cache_root.join(cache_key(url));

        if let Some(exe) = archive::find_file(&dir, &exe_name) {
            info!(path = %exe.display(), "using cached ninja");
            return Ok(exe);
        }

        ensure_dir(&dir).await?;
        let zip = dir.join("ninja.zip");
        info!(url, "downloading ninja");
        Downloader::new()
            .url(url)
            .file(&zip)
            .progress(self.progress)
            .download()
            .await?;

        let (archive_path, dest) = (zip.clone(), dir.clone());
        tokio::task::spawn_blocking(move || archive::unpack_zip(&archive_path, &dest)).await??;
        if let Err(e) = tokio::fs::remove_file(&zip).await {
            debug!(path = %zip.display(), error = %e, "could not remove ninja archive");
        }

        let exe = archive::find_file(&dir, &exe_name).ok_or_else(|| {
            RunnerError::from(NetworkError::Archive {
                archive: url.to_string(),
                message: format!("no '{exe_name}' in archive"),
            })
        })?;
        make_executable(&exe).await?;
        info!(path = %exe.display(), "ninja ready");
        Ok(exe)
    }
}

impl ToolLocator for NinjaLocator {
    fn resolve_path<'a>(
        &'a self,
        explicit: Option<&'a Path>,
        url: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PathBuf>> {
        Box::pin(async move {
            if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
                debug!(path = %path.display(), "using configured ninja");
                return Ok(path.to_path_buf());
            }
            match url.map(str::trim).filter(|u| !u.is_empty()) {
                Some(url) => self.download(url).await,
                None => self.download(&default_url(self.platform)).await,
            }
        })
    }
}

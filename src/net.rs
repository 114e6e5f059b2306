// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP downloads.
//!
//! ```text
//! Downloader::new()
//!   .url() .file()
//!   .progress() .silent()
//!        |
//!        v
//!   download()  GET -> stream chunks -> file
//!        |
//!        v
//!   Progress display
//!     Bar     [=====>     ] 50MB/100MB
//!     Spinner * 50MB @ 5MB/s
//!     Silent  (none)
//!
//! Global client: OnceLock, connection pool, keep-alive
//! Failure:       partial file removed by PartialFileGuard
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{NetworkError, Result, RunnerError};

/// Removes a partially written download on drop unless kept.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Shared HTTP client. Falls back to a basic client if configuration fails.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("run-vcpkg-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} @ {binary_bytes_per_sec} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bytes} @ {binary_bytes_per_sec}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
        })
        .clone()
}

/// Progress display style for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// Progress bar with speed and ETA.
    #[default]
    Bar,
    /// Spinner, also used when the size is unknown.
    Spinner,
    Silent,
}

/// Async HTTP downloader with builder pattern.
pub struct Downloader {
    client: Client,
    url: Option<String>,
    output_file: Option<PathBuf>,
    progress_display: ProgressDisplay,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            output_file: None,
            progress_display: ProgressDisplay::default(),
        }
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    #[must_use]
    pub const fn progress(mut self, style: ProgressDisplay) -> Self {
        self.progress_display = style;
        self
    }

    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.progress_display = ProgressDisplay::Silent;
        self
    }

    fn create_progress_bar(&self, total_size: u64) -> Option<ProgressBar> {
        match self.progress_display {
            ProgressDisplay::Silent => None,
            ProgressDisplay::Bar if total_size > 0 => {
                let pb = ProgressBar::new(total_size);
                pb.set_style(bar_style());
                Some(pb)
            }
            ProgressDisplay::Bar | ProgressDisplay::Spinner => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                Some(pb)
            }
        }
    }

    /// Downloads the URL into the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL or output file is configured.
    /// - The request fails or returns a non-success status code.
    /// - The output file cannot be created or written to.
    pub async fn download(&self) -> Result<()> {
        let url = self
            .url
            .as_ref()
            .ok_or_else(|| RunnerError::from(NetworkError::InvalidUrl("no URL provided".to_string())))?;
        let output = self.output_file.as_ref().ok_or_else(|| {
            RunnerError::from(NetworkError::DownloadFailed {
                url: url.clone(),
                message: "no output file specified".to_string(),
            })
        })?;
        let failed = |message: String| {
            RunnerError::from(NetworkError::DownloadFailed {
                url: url.clone(),
                message,
            })
        };

        debug!(url, file = %output.display(), "downloading");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RunnerError::from(NetworkError::Reqwest(e)))?;

        if !response.status().is_success() {
            return Err(RunnerError::from(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.clone(),
            })
            .into());
        }

        let total_size = response.content_length().unwrap_or(0);
        let progress_bar = self.create_progress_bar(total_size);

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                failed(format!(
                    "failed to create parent directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut file = tokio::fs::File::create(output).await.map_err(|e| {
            failed(format!(
                "failed to create output file {}: {e}",
                output.display()
            ))
        })?;
        let mut guard = PartialFileGuard::new(output.clone());

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| RunnerError::from(NetworkError::Reqwest(e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| failed(format!("failed to write to {}: {e}", output.display())))?;
            if let Some(pb) = &progress_bar {
                pb.inc(chunk.len() as u64);
            }
        }

        file.flush()
            .await
            .map_err(|e| failed(format!("failed to flush {}: {e}", output.display())))?;
        guard.keep();

        if let Some(pb) = progress_bar {
            pb.finish_with_message("done");
        }
        Ok(())
    }
}

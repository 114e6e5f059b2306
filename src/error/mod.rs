// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!           RunnerError (~24 bytes)
//!                  |
//!   +------+------+-----+------+------+------+
//!   |      |      |     |      |      |      |
//!   v      v      v     v      v      v      v
//! Cfg    Proc    Git   Net    Fs     Io   Other
//! Box    Box     Box   Box    Box    Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config  MissingKey, InvalidValue, UnknownGenerator, ParseError
//!   Process ExecutableNotFound, SpawnFailed, NonZeroExit
//!   Git     CloneFailed, CheckoutFailed, InvalidFingerprint
//!   Network Reqwest, HttpError, Archive
//!   Fs      NotFound, IoError
//! ```
//!
//! Configuration errors are raised before the step that needs the value and
//! are never retried. Process errors carry the exit code.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`RunnerError`].
pub type RunnerResult<T> = std::result::Result<T, RunnerError>;

/// Top-level error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl RunnerError {
    /// Returns true for errors caused by invalid or missing configuration.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for RunnerError {
                fn from(err: $error) -> Self {
                    RunnerError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    GitError => Git,
    NetworkError => Network,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse a configuration source.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required input '{key}' in section '[{section}]': {message}")]
    MissingKey {
        section: String,
        key: String,
        message: String,
    },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Generator id not present in the catalog.
    #[error("unknown CMake generator '{0}'")]
    UnknownGenerator(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("{what} failed with error code: '{code}'")]
    NonZeroExit { what: String, code: i32 },
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Clone operation failed.
    #[error("failed to clone {url}: exit code {code}")]
    CloneFailed { url: String, code: i32 },

    /// Checkout operation failed.
    #[error("failed to checkout {what}: exit code {code}")]
    CheckoutFailed { what: String, code: i32 },

    /// Not a full lowercase SHA-1 commit id.
    #[error("'{value}' must be a full SHA1 hash (40 hex digits)")]
    InvalidFingerprint { value: String },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Downloaded archive could not be unpacked.
    #[error("failed to extract '{archive}': {message}")]
    Archive { archive: String, message: String },

    /// I/O error during download.
    #[error("io error during download: {0}")]
    Io(#[from] std::io::Error),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

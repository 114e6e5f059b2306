// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The CI host the runners report to.
//!
//! ```text
//! dyn Host
//!   set_variable(name, value)  --> $GITHUB_ENV  + in-process overlay
//!   set_output(name, value)    --> $GITHUB_OUTPUT
//!   add_matcher(m)             --> <dir>/<owner>.json, "::add-matcher::<path>"
//!   remove_matcher(m)          --> "::remove-matcher owner=<owner>::"
//!
//! MatcherGuard::new(host, m)   add on construction, remove on drop
//! ```
//!
//! Variables set here are visible to later [`Host::variable`] lookups in the
//! same process. The process environment itself is never mutated.

pub mod matcher;
#[cfg(test)]
pub(crate) mod recording;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::core::env::Env;
use crate::error::{FsError, Result, RunnerError};

pub use matcher::Matcher;

/// Services provided by the CI host.
pub trait Host: Send + Sync {
    /// Publishes a variable to this and later steps of the job.
    ///
    /// # Errors
    ///
    /// Returns an error if the host's variable file cannot be written.
    fn set_variable(&self, name: &str, value: &str) -> Result<()>;

    /// Looks up a variable published earlier or inherited from the environment.
    fn variable(&self, name: &str) -> Option<String>;

    /// Publishes a step output.
    ///
    /// # Errors
    ///
    /// Returns an error if the host's output file cannot be written.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Registers a problem matcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the matcher definition cannot be written.
    fn add_matcher(&self, matcher: Matcher) -> Result<()>;

    /// Deregisters a problem matcher. Never fails.
    fn remove_matcher(&self, matcher: Matcher);
}

/// Keeps a matcher registered for as long as it is alive.
#[must_use = "the matcher is removed as soon as the guard is dropped"]
pub struct MatcherGuard<'a> {
    host: &'a dyn Host,
    matcher: Matcher,
}

impl<'a> MatcherGuard<'a> {
    /// Registers `matcher` and returns the guard that removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails; nothing is left registered.
    pub fn new(host: &'a dyn Host, matcher: Matcher) -> Result<Self> {
        host.add_matcher(matcher)?;
        Ok(Self { host, matcher })
    }
}

impl Drop for MatcherGuard<'_> {
    fn drop(&mut self) {
        self.host.remove_matcher(self.matcher);
    }
}

/// GitHub Actions host.
///
/// Outside of Actions (no `GITHUB_ENV` / `GITHUB_OUTPUT`), variables and
/// outputs are only logged.
pub struct ActionsHost {
    env_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    matcher_dir: PathBuf,
    published: Mutex<Env>,
    commands: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ActionsHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionsHost")
            .field("env_file", &self.env_file)
            .field("output_file", &self.output_file)
            .field("matcher_dir", &self.matcher_dir)
            .finish_non_exhaustive()
    }
}

impl ActionsHost {
    /// Creates a host writing workflow commands to stdout.
    #[must_use]
    pub fn new(
        env_file: Option<PathBuf>,
        output_file: Option<PathBuf>,
        matcher_dir: PathBuf,
    ) -> Self {
        Self {
            env_file,
            output_file,
            matcher_dir,
            published: Mutex::new(Env::new()),
            commands: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Creates a host from the runner's `GITHUB_ENV`, `GITHUB_OUTPUT` and
    /// `RUNNER_TEMP` variables.
    #[must_use]
    pub fn from_env() -> Self {
        let file = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from);
        let matcher_dir = file("RUNNER_TEMP")
            .unwrap_or_else(std::env::temp_dir)
            .join("run-vcpkg-matchers");
        Self::new(file("GITHUB_ENV"), file("GITHUB_OUTPUT"), matcher_dir)
    }

    /// Redirects workflow commands to `writer`.
    #[must_use]
    pub fn with_command_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.commands = Mutex::new(writer);
        self
    }

    fn command(&self, line: &str) {
        let mut out = self
            .commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %e, command = line, "failed to emit workflow command");
        }
    }
}

/// Appends `name=value` to a workflow file, using the heredoc form for
/// multi-line values.
fn append_file_command(path: &Path, name: &str, value: &str) -> Result<()> {
    let entry = if value.contains('\n') {
        let delimiter = format!("RUNVCPKG_EOF_{}", value.len());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RunnerError::from(FsError::io(path, e)))?;
    file.write_all(entry.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

impl Host for ActionsHost {
    fn set_variable(&self, name: &str, value: &str) -> Result<()> {
        self.published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .set(name, value);
        if let Some(path) = &self.env_file {
            append_file_command(path, name, value)?;
        }
        info!(name, value, "set variable");
        Ok(())
    }

    fn variable(&self, name: &str) -> Option<String> {
        let published = self
            .published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .map(str::to_string);
        published.or_else(|| std::env::var(name).ok())
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        if let Some(path) = &self.output_file {
            append_file_command(path, name, value)?;
        }
        info!(name, value, "set output");
        Ok(())
    }

    fn add_matcher(&self, matcher: Matcher) -> Result<()> {
        std::fs::create_dir_all(&self.matcher_dir)
            .map_err(|e| RunnerError::from(FsError::io(&self.matcher_dir, e)))?;
        let path = self.matcher_dir.join(format!("{}.json", matcher.owner()));
        let body = serde_json::to_string_pretty(&matcher.definition())?;
        std::fs::write(&path, body).map_err(|e| RunnerError::from(FsError::io(&path, e)))?;

        debug!(matcher = %matcher, path = %path.display(), "add matcher");
        self.command(&format!("::add-matcher::{}", path.display()));
        Ok(())
    }

    fn remove_matcher(&self, matcher: Matcher) {
        debug!(matcher = %matcher, "remove matcher");
        self.command(&format!("::remove-matcher owner={}::", matcher.owner()));
    }
}

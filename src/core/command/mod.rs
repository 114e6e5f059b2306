// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command execution seam.
//!
//! ```text
//! VcpkgRunner / CmakeRunner
//!          |
//!          v
//!   dyn CommandRunner ----------------+
//!          |                          |
//!          v                          v
//!   SystemRunner                ScriptedRunner (tests)
//!   ProcessBuilder + ALLOW_FAILURE    canned ProcessOutput
//!   echo + listener                   records Invocations
//! ```
//!
//! A non-zero exit is data at this layer. Callers decide whether it is fatal.

#[cfg(test)]
pub(crate) mod scripted;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::core::env::Env;
use crate::core::process::{OutputListener, ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::Result;

/// One process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Env,
    capture: bool,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Env::new(),
            capture: false,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Variables layered over the inherited environment.
    #[must_use]
    pub fn env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Keep stdout in [`ProcessOutput::stdout`] instead of echoing it.
    #[must_use]
    pub const fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    #[must_use]
    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    #[must_use]
    pub const fn environment(&self) -> &Env {
        &self.env
    }

    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.capture
    }

    /// `<program file name> <args...>`, used for logs and test matching.
    #[must_use]
    pub fn short_line(&self) -> String {
        let mut line = self.program.file_name().map_or_else(
            || self.program.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        for arg in &self.args {
            let _ = write!(line, " {arg}");
        }
        line
    }
}

/// Runs processes on behalf of the runners.
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion.
    ///
    /// Only a failure to spawn is an error; any exit code is returned.
    fn run<'a>(&'a self, invocation: Invocation) -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Resolves a program name through PATH.
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        ProcessBuilder::find(name)
    }
}

/// Runs real processes with [`ProcessBuilder`].
///
/// Output of non-captured invocations is echoed to stdout so the CI host's
/// problem matchers see it, and every line goes to the listener.
#[derive(Default)]
pub struct SystemRunner {
    listener: Option<Arc<dyn OutputListener>>,
}

impl SystemRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a listener that sees every line of every process.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn OutputListener>) -> Self {
        self.listener = Some(listener);
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run<'a>(&'a self, invocation: Invocation) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(async move {
            let mut builder = ProcessBuilder::new(invocation.program())
                .args(invocation.arg_list())
                .env(invocation.environment().clone())
                .flag(ProcessFlags::ALLOW_FAILURE);
            if let Some(cwd) = invocation.working_dir() {
                builder = builder.cwd(cwd);
            }
            builder = if invocation.is_captured() {
                builder.capture_stdout()
            } else {
                builder.flag(ProcessFlags::ECHO_COMMAND).echo()
            };
            if let Some(listener) = &self.listener {
                builder = builder.listener(Arc::clone(listener));
            }
            builder.run().await
        })
    }
}

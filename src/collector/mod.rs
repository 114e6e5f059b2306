// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Log-file collector.
//!
//! ```text
//! process output --chunks--> pending buffer --complete lines--> regexes
//!                                                                  |
//!                                                  capture group 1 = path
//!                                                                  v
//!                                                 dump file contents once
//! ```
//!
//! CMake and vcpkg name their detailed logs in their output
//! (`CMakeOutput.log`, `CMakeError.log`, `*.log` after `See also`). The
//! collector picks those names up and writes the files into the job log.


use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::core::process::OutputListener;
use crate::error::{ConfigError, RunnerError, RunnerResult};

/// Patterns used when none are configured.
pub const DEFAULT_PATTERNS: [&str; 4] = [
    r#"\s*"(.+CMakeOutput\.log)"\.\s*"#,
    r#"\s*"(.+CMakeError\.log)"\.\s*"#,
    r"\s*(.+dependinfo\.cmake)\s*",
    r#"\s*See also "(.+\.log)"\.\s*"#,
];

/// Dumps log files named in process output.
#[derive(Debug)]
pub struct LogFileCollector {
    regexes: Vec<Regex>,
    pending: Mutex<String>,
    seen: Mutex<BTreeSet<PathBuf>>,
}

impl LogFileCollector {
    /// Builds a collector from regexes whose first capture group is a path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a pattern that does not compile.
    pub fn new<I, S>(patterns: I) -> RunnerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let regexes = patterns
            .into_iter()
            .map(|pattern| {
                Regex::new(pattern.as_ref()).map_err(|e| {
                    RunnerError::from(ConfigError::InvalidValue {
                        section: "log".to_string(),
                        key: "collect_patterns".to_string(),
                        message: e.to_string(),
                    })
                })
            })
            .collect::<RunnerResult<Vec<_>>>()?;
        Ok(Self {
            regexes,
            pending: Mutex::new(String::new()),
            seen: Mutex::new(BTreeSet::new()),
        })
    }

    /// Collector with [`DEFAULT_PATTERNS`].
    ///
    /// # Errors
    ///
    /// Never in practice; the default patterns are valid.
    pub fn with_defaults() -> RunnerResult<Self> {
        Self::new(DEFAULT_PATTERNS)
    }

    /// Feeds a raw chunk of output. A trailing partial line is kept until
    /// the next chunk or [`flush`](Self::flush).
    pub fn feed(&self, chunk: &str) {
        let lines: Vec<String> = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            pending.push_str(chunk);
            let Some(last) = pending.rfind('\n') else {
                return;
            };
            let rest = pending.split_off(last + 1);
            let complete = std::mem::replace(&mut *pending, rest);
            complete.lines().map(str::to_string).collect()
        };
        for line in lines {
            self.handle_line(&line);
        }
    }

    /// Processes whatever partial line is still buffered.
    pub fn flush(&self) {
        let rest = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        if !rest.is_empty() {
            self.handle_line(&rest);
        }
    }

    /// Matches one line and dumps the named file. Returns the path of a
    /// file dumped by this call.
    pub fn handle_line(&self, line: &str) -> Option<PathBuf> {
        let line = line.trim_end_matches('\r');
        let path = self.regexes.iter().find_map(|regex| {
            regex
                .captures(line)
                .and_then(|captures| captures.get(1))
                .map(|m| PathBuf::from(m.as_str().trim()))
        })?;

        let first = self
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.clone());
        if !first {
            debug!(path = %path.display(), "log file already dumped");
            return None;
        }
        dump(&path).then_some(path)
    }

    /// Paths named in output so far, dumped or not.
    #[must_use]
    pub fn seen(&self) -> Vec<PathBuf> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl OutputListener for LogFileCollector {
    fn on_line(&self, line: &str) {
        self.handle_line(line);
    }
}

fn dump(path: &Path) -> bool {
    match std::fs::read(path) {
        Ok(bytes) => {
            let contents = String::from_utf8_lossy(&bytes);
            info!(path = %path.display(), "\n{contents}");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read log file");
            false
        }
    }
}

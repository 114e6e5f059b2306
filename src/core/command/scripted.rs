// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted [`CommandRunner`] for unit tests.
//!
//! Rules are matched in order against [`Invocation::short_line`] by prefix.
//! A `once` rule is consumed by its first match. Unmatched invocations exit 0
//! with empty output.

use std::path::PathBuf;
use std::sync::Mutex;

use futures_util::future::BoxFuture;

use super::{CommandRunner, Invocation};
use crate::core::process::ProcessOutput;
use crate::error::Result;

struct Rule {
    prefix: String,
    output: ProcessOutput,
    once: bool,
}

#[derive(Default)]
pub(crate) struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(self, prefix: &str, output: ProcessOutput, once: bool) -> Self {
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.to_string(),
            output,
            once,
        });
        self
    }

    /// Every matching invocation exits with `code` and prints `stdout`.
    pub(crate) fn on(self, prefix: &str, code: i32, stdout: &str) -> Self {
        self.push(
            prefix,
            ProcessOutput::new(code, stdout.to_string(), String::new()),
            false,
        )
    }

    /// Only the next matching invocation gets this answer.
    pub(crate) fn once(self, prefix: &str, code: i32, stdout: &str) -> Self {
        self.push(
            prefix,
            ProcessOutput::new(code, stdout.to_string(), String::new()),
            true,
        )
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::short_line).collect()
    }

    /// Number of recorded invocations whose short line starts with `prefix`.
    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run<'a>(&'a self, invocation: Invocation) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(async move {
            let line = invocation.short_line();
            self.calls.lock().unwrap().push(invocation);

            let mut rules = self.rules.lock().unwrap();
            let found = rules.iter().position(|r| line.starts_with(&r.prefix));
            let output = match found {
                Some(index) if rules[index].once => rules.remove(index).output,
                Some(index) => rules[index].output.clone(),
                None => ProcessOutput::default(),
            };
            Ok(output)
        })
    }

    fn find_program(&self, name: &str) -> Option<PathBuf> {
        Some(PathBuf::from(name))
    }
}

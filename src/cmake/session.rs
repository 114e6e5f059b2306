// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configure and build steps shared by every mode.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::matcher::select_matcher_for;
use super::toolchain::{ToolchainSetup, inject_vcpkg_toolchain};
use crate::core::command::{CommandRunner, Invocation};
use crate::core::env::Env;
use crate::core::host::{Host, Matcher, MatcherGuard};
use crate::core::platform::Platform;
use crate::error::{ProcessError, Result, RunnerError};
use crate::ninja::ToolLocator;
use crate::utility::args::split_args;
use crate::utility::fs::ensure_dir;

/// Collaborators and resolved programs for one CMake run.
pub(super) struct Session<'a> {
    pub(super) runner: &'a dyn CommandRunner,
    pub(super) host: &'a dyn Host,
    pub(super) locator: &'a dyn ToolLocator,
    pub(super) platform: Platform,
    pub(super) cmake: PathBuf,
    pub(super) wrapper: Option<PathBuf>,
}

impl Session<'_> {
    /// Program and leading arguments of the configure step.
    pub(super) fn configure_prefix(&self) -> (PathBuf, Vec<String>) {
        match &self.wrapper {
            Some(wrapper) => (wrapper.clone(), vec![self.cmake.display().to_string()]),
            None => (self.cmake.clone(), Vec::new()),
        }
    }

    pub(super) async fn ninja(&self, explicit: Option<&Path>, url: Option<&str>) -> Result<PathBuf> {
        self.locator.resolve_path(explicit, url).await
    }

    pub(super) async fn toolchain(
        &self,
        args: Vec<String>,
        triplet: Option<&str>,
    ) -> Result<ToolchainSetup> {
        inject_vcpkg_toolchain(args, triplet, self.runner, self.host, self.platform).await
    }

    /// Runs `<program> <args>` in `build_dir` under the `cmake` matcher.
    pub(super) async fn configure(
        &self,
        program: PathBuf,
        args: Vec<String>,
        env: &Env,
        build_dir: &Path,
    ) -> Result<()> {
        ensure_dir(build_dir).await?;
        debug!(args = ?args, "CMake arguments");
        info!(build_dir = %build_dir.display(), "generating project files with CMake");

        let output = {
            let _matcher = MatcherGuard::new(self.host, Matcher::Cmake)?;
            self.runner
                .run(
                    Invocation::new(program)
                        .args(args)
                        .cwd(build_dir)
                        .env(env.clone()),
                )
                .await?
        };
        if !output.success() {
            return Err(RunnerError::from(ProcessError::NonZeroExit {
                what: "CMake".to_string(),
                code: output.exit_code(),
            })
            .into());
        }
        Ok(())
    }

    /// Runs `cmake --build . <build_line>` in `build_dir` under the
    /// matcher of the configured compiler.
    pub(super) async fn build(&self, build_dir: &Path, build_line: &str, env: &Env) -> Result<()> {
        let matcher = select_matcher_for(build_dir, self.platform);
        let _matcher = MatcherGuard::new(self.host, matcher)?;

        info!(build_dir = %build_dir.display(), "building with CMake");
        let output = self
            .runner
            .run(
                Invocation::new(&self.cmake)
                    .args(["--build", "."])
                    .args(split_args(build_line))
                    .cwd(build_dir)
                    .env(env.clone()),
            )
            .await?;
        if !output.success() {
            return Err(RunnerError::from(ProcessError::NonZeroExit {
                what: "Build".to_string(),
                code: output.exit_code(),
            })
            .into());
        }
        Ok(())
    }
}

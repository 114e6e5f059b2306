// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! vcpkg bootstrapper.
//!
//! ```text
//! run()
//!  |  [matcher "all" registered for the whole run]
//!  v
//! publish RUNVCPKG_VCPKG_ROOT, VCPKG_ROOT, triplet
//!  |
//!  v
//! mkdir root, current = git rev-parse HEAD
//!  |
//!  +-- skip_update ----------------------------+
//!  |                                           |
//!  v                                           |
//! up to date?  submodule              -> yes   |
//!              repo && pin == current -> yes   |
//!  | no                                        |
//!  v                                           |
//! rm -rf root, clone -n, checkout --force pin  |
//!  |  (rebuild)                                v
//!  |                        record != current? -> rebuild
//!  |                        exe missing?       -> rebuild
//!  |                        `vcpkg version` != 0 -> rebuild
//!  v                                           |
//! bootstrap-vcpkg.{sh,bat}, store record <-----+ (if rebuild)
//!  |
//!  v
//! vcpkg install ... (cwd = install target, optional)
//! ```

pub mod record;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

pub use record::{BuildRecord, RECORD_FILE_NAME};

use crate::core::command::{CommandRunner, Invocation};
use crate::core::env::Env;
use crate::core::host::{Host, Matcher, MatcherGuard};
use crate::core::platform::Platform;
use crate::error::{ConfigError, ProcessError, Result, RunnerError};
use crate::git::{
    self, Fingerprint, checkout_force, clone_no_checkout, is_git_repo, is_linked_submodule,
    resolve_fingerprint,
};
use crate::utility::args::split_args;
use crate::utility::fs::{ensure_dir, make_executable, recreate_dir};

/// Repository cloned when no URL is configured.
pub const DEFAULT_URL: &str = "https://github.com/microsoft/vcpkg.git";

/// Install subcommand used when none is configured.
pub const DEFAULT_INSTALL_COMMAND: &str = "install --recurse --clean-after-build";

/// Variable holding the vcpkg root for later steps.
pub const ROOT_VAR: &str = "RUNVCPKG_VCPKG_ROOT";
/// Variable read by vcpkg itself.
pub const VCPKG_ROOT_VAR: &str = "VCPKG_ROOT";
/// Variable holding the default triplet for later steps.
pub const TRIPLET_VAR: &str = "RUNVCPKG_VCPKG_DEFAULT_TRIPLET";
/// Variable read by vcpkg itself.
pub const VCPKG_TRIPLET_VAR: &str = "VCPKG_DEFAULT_TRIPLET";

const SECTION: &str = "vcpkg";

/// Keeps a vcpkg checkout built at a pinned commit.
pub struct VcpkgRunner<'a> {
    runner: &'a dyn CommandRunner,
    host: &'a dyn Host,
    platform: Platform,
    arch: &'static str,
    root: PathBuf,
    url: String,
    pin: Option<Fingerprint>,
    skip_update: bool,
    install_target: Option<PathBuf>,
    install_command: Option<String>,
    triplet: Option<String>,
}

impl std::fmt::Debug for VcpkgRunner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcpkgRunner")
            .field("platform", &self.platform)
            .field("arch", &self.arch)
            .field("root", &self.root)
            .field("url", &self.url)
            .field("pin", &self.pin)
            .field("skip_update", &self.skip_update)
            .field("install_target", &self.install_target)
            .field("install_command", &self.install_command)
            .field("triplet", &self.triplet)
            .finish_non_exhaustive()
    }
}

impl<'a> VcpkgRunner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        host: &'a dyn Host,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            host,
            platform: Platform::current(),
            arch: std::env::consts::ARCH,
            root: root.into(),
            url: DEFAULT_URL.to_string(),
            pin: None,
            skip_update: false,
            install_target: None,
            install_command: None,
            triplet: None,
        }
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the commit to check out. An empty string means no pin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `pin` is not a full commit id.
    pub fn pin(mut self, pin: &str) -> Result<Self> {
        let pin = pin.trim();
        if pin.is_empty() {
            self.pin = None;
            return Ok(self);
        }
        let fingerprint = pin.parse::<Fingerprint>().map_err(|e| {
            RunnerError::from(ConfigError::InvalidValue {
                section: SECTION.to_string(),
                key: "commit_id".to_string(),
                message: e.to_string(),
            })
        })?;
        self.pin = Some(fingerprint);
        Ok(self)
    }

    #[must_use]
    pub const fn skip_update(mut self, skip: bool) -> Self {
        self.skip_update = skip;
        self
    }

    /// Runs `vcpkg install` in `dir` after the executable is ready.
    #[must_use]
    pub fn install_target(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_target = Some(dir.into());
        self
    }

    /// Replaces the whole install subcommand line.
    #[must_use]
    pub fn install_command(mut self, command: impl Into<String>) -> Self {
        let command = command.into();
        self.install_command = (!command.trim().is_empty()).then_some(command);
        self
    }

    #[must_use]
    pub fn triplet(mut self, triplet: impl Into<String>) -> Self {
        let triplet = triplet.into();
        self.triplet = (!triplet.trim().is_empty()).then_some(triplet);
        self
    }

    #[must_use]
    pub const fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// CPU architecture used to pick the default triplet, in
    /// `std::env::consts::ARCH` spelling.
    #[must_use]
    pub const fn arch(mut self, arch: &'static str) -> Self {
        self.arch = arch;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the vcpkg executable inside the root.
    #[must_use]
    pub fn executable(&self) -> PathBuf {
        self.root.join(self.platform.exe_name("vcpkg"))
    }

    fn effective_triplet(&self) -> &str {
        self.triplet
            .as_deref()
            .unwrap_or_else(|| self.platform.default_triplet(self.arch))
    }

    /// Variables every vcpkg child process sees, matching what
    /// [`Self::set_outputs`] publishes for later steps.
    fn child_env(&self) -> Env {
        let root = self.root.display().to_string();
        let triplet = self.effective_triplet();
        let mut env = Env::new();
        env.set(ROOT_VAR, &root)
            .set(VCPKG_ROOT_VAR, &root)
            .set(TRIPLET_VAR, triplet)
            .set(VCPKG_TRIPLET_VAR, triplet);
        env
    }

    /// Bootstraps vcpkg if needed, then runs the optional install.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing pin, a failing clone, checkout,
    /// bootstrap or install, or if outputs cannot be published.
    pub async fn run(&self) -> Result<()> {
        let _matcher = MatcherGuard::new(self.host, Matcher::All)?;
        debug!(root = %self.root.display(), "vcpkg runner starting");

        self.set_outputs().context("failed to set output variables")?;

        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "creating vcpkg root directory");
        }
        ensure_dir(&self.root).await?;

        let git = git::git_program(self.runner);
        let current = resolve_fingerprint(self.runner, &git, &self.root).await;

        let mut rebuild = false;
        if self.skip_update {
            info!(root = %self.root.display(), "skipping any check to update the vcpkg directory");
        } else if !self.is_up_to_date(&git, current.as_ref()).await? {
            self.clone_repo(&git).await?;
            rebuild = true;
        }

        if !rebuild {
            rebuild = BuildRecord::in_root(&self.root)
                .is_stale(current.as_ref())
                .await;
        }
        if !rebuild {
            rebuild = self.executable_needs_rebuild().await;
        }

        if rebuild {
            self.build(&git).await?;
        }

        self.install().await
    }

    fn set_outputs(&self) -> Result<()> {
        let root = self.root.display().to_string();
        self.host.set_variable(ROOT_VAR, &root)?;
        self.host.set_variable(VCPKG_ROOT_VAR, &root)?;
        self.host.set_output(&format!("{ROOT_VAR}_OUT"), &root)?;

        let triplet = self.effective_triplet();
        self.host.set_variable(TRIPLET_VAR, triplet)?;
        self.host.set_variable(VCPKG_TRIPLET_VAR, triplet)?;
        self.host.set_output(&format!("{TRIPLET_VAR}_OUT"), triplet)?;
        Ok(())
    }

    fn require_pin(&self, message: &str) -> Result<&Fingerprint> {
        self.pin.as_ref().ok_or_else(|| {
            RunnerError::from(ConfigError::MissingKey {
                section: SECTION.to_string(),
                key: "commit_id".to_string(),
                message: message.to_string(),
            })
            .into()
        })
    }

    async fn is_up_to_date(&self, git: &Path, current: Option<&Fingerprint>) -> Result<bool> {
        info!(
            commit = current.map_or("", Fingerprint::as_str),
            "checking whether the vcpkg repository is up to date"
        );

        if is_linked_submodule(self.runner, git, &self.root).await {
            info!(root = %self.root.display(), "vcpkg is a git submodule");
            if let Some(pin) = &self.pin {
                warn!(
                    root = %self.root.display(),
                    commit = %pin,
                    "vcpkg directory is a submodule, the configured commit id is ignored"
                );
            }
            return Ok(true);
        }

        let pin = self.require_pin(&format!(
            "must be provided when the vcpkg directory ({}) is not a submodule",
            self.root.display()
        ))?;
        let updated = is_git_repo(&self.root) && current == Some(pin);
        if updated {
            info!(commit = %pin, "repository is up to date with the requested commit id");
        } else {
            info!(commit = %pin, "repository is not at the requested commit id");
        }
        Ok(updated)
    }

    async fn clone_repo(&self, git: &Path) -> Result<()> {
        let pin = self.require_pin(
            "must be provided to clone the vcpkg repository into an empty directory",
        )?;
        if self.url.trim().is_empty() {
            return Err(RunnerError::from(ConfigError::MissingKey {
                section: SECTION.to_string(),
                key: "url".to_string(),
                message: "a repository URL is needed to clone vcpkg".to_string(),
            })
            .into());
        }

        info!(root = %self.root.display(), "cloning vcpkg");
        recreate_dir(&self.root).await?;
        clone_no_checkout(self.runner, git, &self.url, &self.root).await?;
        checkout_force(self.runner, git, &self.root, pin).await?;
        info!(root = %self.root.display(), commit = %pin, "cloned vcpkg");
        Ok(())
    }

    /// Self-check of an existing executable. Failures only request a rebuild.
    async fn executable_needs_rebuild(&self) -> bool {
        let exe = self.executable();
        if !exe.is_file() {
            info!(path = %exe.display(), "vcpkg executable is missing, building it");
            return true;
        }

        if let Err(e) = make_executable(&exe).await {
            debug!(path = %exe.display(), error = %e, "could not mark vcpkg executable");
        }
        info!(path = %exe.display(), "vcpkg executable exists");

        match self
            .runner
            .run(
                Invocation::new(&exe)
                    .arg("version")
                    .env(self.child_env())
                    .capture(),
            )
            .await
        {
            Ok(output) if output.success() => false,
            Ok(output) => {
                info!(code = output.exit_code(), "vcpkg executable failed, forcing a rebuild");
                true
            }
            Err(e) => {
                info!(error = %e, "vcpkg executable could not run, forcing a rebuild");
                true
            }
        }
    }

    async fn build(&self, git: &Path) -> Result<()> {
        let invocation = if self.platform.is_windows() {
            let script = self.root.join("bootstrap-vcpkg.bat");
            let cmd = self
                .runner
                .find_program("cmd.exe")
                .unwrap_or_else(|| PathBuf::from("cmd.exe"));
            Invocation::new(cmd).arg("/c").arg(script.display().to_string())
        } else {
            let script = self.root.join("bootstrap-vcpkg.sh");
            if let Err(e) = make_executable(&script).await {
                debug!(path = %script.display(), error = %e, "could not mark bootstrap script");
            }
            let sh = self
                .runner
                .find_program("sh")
                .unwrap_or_else(|| PathBuf::from("sh"));
            Invocation::new(sh).arg("-c").arg(script.display().to_string())
        };

        info!(root = %self.root.display(), "building vcpkg");
        let output = self
            .runner
            .run(invocation.cwd(&self.root).env(self.child_env()))
            .await?;
        if !output.success() {
            return Err(RunnerError::from(ProcessError::NonZeroExit {
                what: "bootstrap-vcpkg".to_string(),
                code: output.exit_code(),
            })
            .into());
        }

        let built = resolve_fingerprint(self.runner, git, &self.root).await;
        BuildRecord::in_root(&self.root).store(built.as_ref())
    }

    /// Arguments of the install step for `target`.
    #[must_use]
    pub fn install_args(&self, target: &Path) -> Vec<String> {
        match &self.install_command {
            Some(command) => split_args(command),
            None => {
                let mut args = split_args(DEFAULT_INSTALL_COMMAND);
                args.push("--x-install-root".to_string());
                args.push(target.display().to_string());
                args
            }
        }
    }

    async fn install(&self) -> Result<()> {
        let Some(target) = &self.install_target else {
            return Ok(());
        };

        let args = self.install_args(target);
        info!(
            command = args.join(" "),
            dir = %target.display(),
            "running vcpkg install"
        );
        let output = self
            .runner
            .run(
                Invocation::new(self.executable())
                    .args(args)
                    .cwd(target)
                    .env(self.child_env()),
            )
            .await?;
        if !output.success() {
            return Err(RunnerError::from(ProcessError::NonZeroExit {
                what: "vcpkg install".to_string(),
                code: output.exit_code(),
            })
            .into());
        }
        Ok(())
    }
}

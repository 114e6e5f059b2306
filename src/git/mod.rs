// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git queries and operations.
//!
//! ```text
//!   resolve_fingerprint(dir)        git rev-parse HEAD       (cwd = dir)
//!   is_linked_submodule(git, dir)   git submodule status dir (cwd = parent)
//!   clone_no_checkout(url, dir)     git clone <url> -n .     (cwd = dir)
//!   checkout_force(dir, pin)        git checkout --force pin (cwd = dir)
//!            \        |        /
//!             v       v       v
//!           dyn CommandRunner (git CLI)
//!
//!   is_git_repo(dir)                gix::open, no subprocess
//! ```
//!
//! Queries never fail: an unusable answer is `None` or `false` with a debug
//! log. Clone and checkout failures are fatal.

pub mod fingerprint;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use fingerprint::Fingerprint;

use crate::core::command::{CommandRunner, Invocation};
use crate::core::env::Env;
use crate::error::{GitError, Result, RunnerError};

/// Resolves the git executable, falling back to a bare `git`.
#[must_use]
pub fn git_program(runner: &dyn CommandRunner) -> PathBuf {
    runner
        .find_program("git")
        .unwrap_or_else(|| PathBuf::from("git"))
}

/// A git invocation that never prompts for credentials.
fn git(program: &Path, cwd: &Path) -> Invocation {
    let mut env = Env::new();
    env.set("GCM_INTERACTIVE", "never")
        .set("GIT_TERMINAL_PROMPT", "0");
    Invocation::new(program).cwd(cwd).env(env)
}

/// Returns the commit checked out in `dir`.
///
/// `None` when git fails or prints something that is not a full commit id.
pub async fn resolve_fingerprint(
    runner: &dyn CommandRunner,
    program: &Path,
    dir: &Path,
) -> Option<Fingerprint> {
    let invocation = git(program, dir).args(["rev-parse", "HEAD"]).capture();
    let output = match runner.run(invocation).await {
        Ok(output) => output,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "git rev-parse could not be spawned");
            info!(dir = %dir.display(), "commit id could not be determined");
            return None;
        }
    };

    if !output.success() {
        debug!(
            dir = %dir.display(),
            code = output.exit_code(),
            stderr = output.stderr(),
            "git rev-parse failed"
        );
        info!(dir = %dir.display(), "commit id could not be determined");
        return None;
    }

    let text = output.stdout().trim();
    match text.parse::<Fingerprint>() {
        Ok(fingerprint) => {
            debug!(dir = %dir.display(), commit = %fingerprint, "resolved commit id");
            Some(fingerprint)
        }
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "git rev-parse printed no commit id");
            None
        }
    }
}

/// Returns true if the parent repository records `dir` as a submodule.
pub async fn is_linked_submodule(runner: &dyn CommandRunner, program: &Path, dir: &Path) -> bool {
    let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) else {
        debug!(dir = %dir.display(), "no parent directory, not a submodule");
        return false;
    };

    let invocation = git(program, parent)
        .args(["submodule", "status"])
        .arg(dir.display().to_string())
        .capture();
    match runner.run(invocation).await {
        Ok(output) => {
            let linked = output.success() && !output.stdout().trim().is_empty();
            debug!(dir = %dir.display(), linked, "submodule check");
            linked
        }
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "git submodule status could not be spawned");
            false
        }
    }
}

/// Returns true if `dir` itself is the top of a git work tree.
///
/// A directory nested somewhere inside another repository is not one.
#[must_use]
pub fn is_git_repo(dir: &Path) -> bool {
    match gix::open(dir) {
        Ok(repo) => repo
            .workdir()
            .and_then(|w| std::fs::canonicalize(w).ok())
            .zip(std::fs::canonicalize(dir).ok())
            .is_some_and(|(workdir, dir)| workdir == dir),
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "not a git repository");
            false
        }
    }
}

/// Clones `url` into the existing, empty `dir` without checking out files.
///
/// # Errors
///
/// Returns `GitError::CloneFailed` on a non-zero exit.
pub async fn clone_no_checkout(
    runner: &dyn CommandRunner,
    program: &Path,
    url: &str,
    dir: &Path,
) -> Result<()> {
    info!(url, dir = %dir.display(), "cloning");
    let output = runner
        .run(git(program, dir).args(["clone", url, "-n", "."]))
        .await?;
    if !output.success() {
        return Err(RunnerError::from(GitError::CloneFailed {
            url: url.to_string(),
            code: output.exit_code(),
        })
        .into());
    }
    Ok(())
}

/// Force-checks out `pin` in `dir`.
///
/// # Errors
///
/// Returns `GitError::CheckoutFailed` on a non-zero exit.
pub async fn checkout_force(
    runner: &dyn CommandRunner,
    program: &Path,
    dir: &Path,
    pin: &Fingerprint,
) -> Result<()> {
    info!(commit = %pin, dir = %dir.display(), "checking out");
    let output = runner
        .run(git(program, dir).args(["checkout", "--force", pin.as_str()]))
        .await?;
    if !output.success() {
        return Err(RunnerError::from(GitError::CheckoutFailed {
            what: pin.to_string(),
            code: output.exit_code(),
        })
        .into());
    }
    Ok(())
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `vcpkg` command.

use anyhow::Context;
use tracing::info;

use super::Services;
use crate::config::Config;
use crate::core::command::CommandRunner;
use crate::core::host::Host;
use crate::error::Result;
use crate::vcpkg::VcpkgRunner;

/// Builds the [`VcpkgRunner`] described by `config`.
///
/// Relative paths resolve against the working directory.
///
/// # Errors
///
/// Returns an error if a path cannot be made absolute or the commit id is
/// not a full SHA1.
pub fn vcpkg_runner<'a>(
    config: &Config,
    runner: &'a dyn CommandRunner,
    host: &'a dyn Host,
) -> Result<VcpkgRunner<'a>> {
    let settings = &config.vcpkg;
    let root = std::path::absolute(&settings.root)
        .with_context(|| format!("invalid vcpkg root {}", settings.root.display()))?;

    let mut vcpkg = VcpkgRunner::new(runner, host, root)
        .url(settings.url.clone())
        .pin(&settings.commit_id)?
        .skip_update(settings.skip_update)
        .install_command(settings.install_command.clone());
    if !settings.triplet.is_empty() {
        vcpkg = vcpkg.triplet(settings.triplet.clone());
    }
    match &settings.install_target {
        Some(target) if !settings.setup_only => {
            let target = std::path::absolute(target)
                .with_context(|| format!("invalid install directory {}", target.display()))?;
            vcpkg = vcpkg.install_target(target);
        }
        Some(_) => info!("setup only, vcpkg install is skipped"),
        None => {}
    }
    Ok(vcpkg)
}

/// Main handler for the `vcpkg` command.
///
/// # Errors
///
/// Returns an error if setup, bootstrap or install fails.
pub async fn run_vcpkg_command(config: &Config) -> Result<()> {
    let services = Services::from_config(config)?;
    let vcpkg = vcpkg_runner(config, &services.runner, &services.host)?;
    info!(root = %vcpkg.root().display(), "setting up vcpkg");
    vcpkg.run().await.context("vcpkg setup failed")
}

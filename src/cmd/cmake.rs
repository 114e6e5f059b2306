// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `cmake` command.

use std::path::PathBuf;

use anyhow::Context;

use super::Services;
use crate::cmake::{CmakeOptions, CmakeRunner};
use crate::config::Config;
use crate::config::types::CmakeConfig;
use crate::error::Result;
use crate::ninja::NinjaLocator;

/// Cache directory for ninja downloads when none is configured.
#[must_use]
pub fn default_ninja_cache() -> PathBuf {
    std::env::var_os("RUNNER_TEMP")
        .filter(|dir| !dir.is_empty())
        .map_or_else(std::env::temp_dir, PathBuf::from)
        .join("run-vcpkg-ninja")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Options shared by every mode, taken from `[cmake]`.
#[must_use]
pub fn cmake_options(settings: &CmakeConfig) -> CmakeOptions {
    CmakeOptions {
        build_dir: settings.build_dir.clone(),
        use_vcpkg_toolchain: settings.use_vcpkg_toolchain,
        triplet: non_empty(&settings.triplet),
        do_build: settings.build,
        ninja_path: settings.ninja_path.clone(),
        ninja_url: non_empty(&settings.ninja_url),
        wrapper: settings.wrapper.clone(),
        cmake_path: settings.cmake_path.clone(),
        source_root: settings.source_root.clone(),
    }
}

/// Main handler for the `cmake` command.
///
/// # Errors
///
/// Returns an error if the mode options are invalid or configure or build
/// fails.
pub async fn run_cmake_command(config: &Config) -> Result<()> {
    let settings = &config.cmake;
    let mode = settings.to_mode()?;
    let services = Services::from_config(config)?;
    let locator = NinjaLocator::new(
        settings
            .ninja_cache
            .clone()
            .unwrap_or_else(default_ninja_cache),
    );

    CmakeRunner::new(
        &services.runner,
        &services.host,
        &locator,
        mode,
        cmake_options(settings),
    )
    .run()
    .await
    .with_context(|| format!("CMake run in mode '{}' failed", settings.mode))
}

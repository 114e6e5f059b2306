// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! run-vcpkg [global options] <command>
//! vcpkg     bootstrap the pinned vcpkg, optionally install
//! cmake     configure and optionally build
//! options   print the effective configuration
//! version
//! ```
//!
//! Every command flag also reads the GitHub Actions `INPUT_*` variable of
//! the matching action input.

pub mod cmake;
pub mod global;
pub mod vcpkg;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};

use crate::cli::cmake::CmakeArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::vcpkg::VcpkgArgs;

/// Pinned vcpkg bootstrapper and CMake driver for CI jobs.
#[derive(Debug, Parser)]
#[command(
    name = "run-vcpkg",
    author,
    version,
    about = "Pinned vcpkg bootstrapper and CMake driver for CI jobs",
    long_about = "run-vcpkg-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  `run-vcpkg vcpkg` clones vcpkg at the pinned commit, rebuilds\n\
                  it only when needed and publishes VCPKG_ROOT for later steps.\n\
                  `run-vcpkg cmake` configures and builds a CMake project,\n\
                  optionally through the vcpkg toolchain.",
    after_help = "CONFIGURATION:\n\n\
                  Options are read from `run-vcpkg.toml` in the current directory,\n\
                  then from --config files, then from RUNVCPKG__<SECTION>__<KEY>\n\
                  environment variables, then from command flags and --set."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Sets up vcpkg and optionally installs dependencies.
    Vcpkg(VcpkgArgs),

    /// Configures and optionally builds with CMake.
    Cmake(CmakeArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Pushes `section.key=value` unless `value` is empty.
fn push_override(overrides: &mut Vec<String>, key: &str, value: Option<impl std::fmt::Display>) {
    if let Some(value) = value {
        let value = value.to_string();
        if !value.is_empty() {
            overrides.push(format!("{key}={value}"));
        }
    }
}

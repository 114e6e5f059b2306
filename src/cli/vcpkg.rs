// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `vcpkg` command.

use std::path::PathBuf;

use clap::Args;
use clap::builder::BoolishValueParser;

use super::push_override;

/// Arguments for the `vcpkg` command. Unset flags keep the configured value.
#[derive(Debug, Clone, Default, Args)]
pub struct VcpkgArgs {
    /// vcpkg checkout directory.
    #[arg(long = "vcpkg-directory", value_name = "DIR", env = "INPUT_VCPKGDIRECTORY")]
    pub root: Option<PathBuf>,

    /// Repository to clone vcpkg from.
    #[arg(long = "vcpkg-git-url", value_name = "URL", env = "INPUT_VCPKGGITURL")]
    pub url: Option<String>,

    /// Full commit id to check out.
    #[arg(long = "vcpkg-git-commit-id", value_name = "SHA", env = "INPUT_VCPKGGITCOMMITID")]
    pub commit_id: Option<String>,

    /// Default triplet to publish.
    #[arg(long = "vcpkg-triplet", value_name = "TRIPLET", env = "INPUT_VCPKGTRIPLET")]
    pub triplet: Option<String>,

    /// Uses the checkout as is.
    #[arg(
        long = "do-not-update-vcpkg",
        value_name = "BOOL",
        env = "INPUT_DONOTUPDATEVCPKG",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub skip_update: Option<bool>,

    /// Bootstraps only, skips `vcpkg install`.
    #[arg(
        long = "setup-only",
        value_name = "BOOL",
        env = "INPUT_SETUPONLY",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub setup_only: Option<bool>,

    /// Directory to run `vcpkg install` in.
    #[arg(long = "install-directory", value_name = "DIR", env = "INPUT_VCPKGINSTALLDIRECTORY")]
    pub install_target: Option<PathBuf>,

    /// Replaces the `vcpkg install` arguments.
    #[arg(
        long = "install-command",
        value_name = "ARGS",
        env = "INPUT_RUNVCPKGFORMATSTRING",
        allow_hyphen_values = true
    )]
    pub install_command: Option<String>,
}

impl VcpkgArgs {
    /// Converts the flags that were given to `section.key=value` overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();
        push_override(&mut overrides, "vcpkg.root", self.root.as_ref().map(|p| p.display()));
        push_override(&mut overrides, "vcpkg.url", self.url.as_ref());
        push_override(&mut overrides, "vcpkg.commit_id", self.commit_id.as_ref());
        push_override(&mut overrides, "vcpkg.triplet", self.triplet.as_ref());
        push_override(&mut overrides, "vcpkg.skip_update", self.skip_update);
        push_override(&mut overrides, "vcpkg.setup_only", self.setup_only);
        push_override(
            &mut overrides,
            "vcpkg.install_target",
            self.install_target.as_ref().map(|p| p.display()),
        );
        push_override(&mut overrides, "vcpkg.install_command", self.install_command.as_ref());
        overrides
    }
}

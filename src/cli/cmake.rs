// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `cmake` command.
//!
//! ```text
//! --mode basic     --lists-file --generator --build-type --toolchain --build-args
//! --mode advanced  --lists-file --appended-args --build-args
//! --mode settings  --settings-file --configuration-filter --appended-args
//! any mode         --build-dir --build --use-vcpkg-toolchain --vcpkg-triplet
//!                  --ninja-* --wrapper --cmake-path --source-root
//! ```

use std::path::PathBuf;

use clap::Args;
use clap::builder::BoolishValueParser;

use super::push_override;

/// Arguments for the `cmake` command. Unset flags keep the configured value.
#[derive(Debug, Clone, Default, Args)]
pub struct CmakeArgs {
    /// CMakeListsTxtBasic, CMakeListsTxtAdvanced or CMakeSettingsJson.
    #[arg(long, value_name = "MODE", env = "INPUT_CMAKELISTSORSETTINGSJSON")]
    pub mode: Option<String>,

    #[arg(long = "lists-file", value_name = "FILE", env = "INPUT_CMAKELISTSTXTPATH")]
    pub lists_file: Option<PathBuf>,

    #[arg(long = "settings-file", value_name = "FILE", env = "INPUT_CMAKESETTINGSJSONPATH")]
    pub settings_file: Option<PathBuf>,

    /// Generator id, e.g. Ninja, NinjaMulti, UnixMakefiles, VS16Win64.
    #[arg(long, value_name = "ID", env = "INPUT_CMAKEGENERATOR")]
    pub generator: Option<String>,

    #[arg(long = "build-type", value_name = "TYPE", env = "INPUT_CMAKEBUILDTYPE")]
    pub build_type: Option<String>,

    #[arg(long, value_name = "FILE", env = "INPUT_CMAKETOOLCHAINPATH")]
    pub toolchain: Option<PathBuf>,

    /// Extra configure arguments, double-quote aware.
    #[arg(
        long = "appended-args",
        value_name = "ARGS",
        env = "INPUT_CMAKEAPPENDEDARGS",
        allow_hyphen_values = true
    )]
    pub appended_args: Option<String>,

    /// Extra `cmake --build` arguments, double-quote aware.
    #[arg(
        long = "build-args",
        value_name = "ARGS",
        env = "INPUT_BUILDWITHCMAKEARGS",
        allow_hyphen_values = true
    )]
    pub build_args: Option<String>,

    /// Regex selecting CMakeSettings.json configurations by name.
    #[arg(
        long = "configuration-filter",
        value_name = "REGEX",
        env = "INPUT_CONFIGURATIONREGEXFILTER"
    )]
    pub configuration_filter: Option<String>,

    #[arg(long = "build-dir", value_name = "DIR", env = "INPUT_BUILDDIRECTORY")]
    pub build_dir: Option<PathBuf>,

    #[arg(
        long = "use-vcpkg-toolchain",
        value_name = "BOOL",
        env = "INPUT_USEVCPKGTOOLCHAINFILE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub use_vcpkg_toolchain: Option<bool>,

    #[arg(long = "vcpkg-triplet", value_name = "TRIPLET", env = "INPUT_VCPKGTRIPLET")]
    pub triplet: Option<String>,

    /// Runs `cmake --build` after configuring.
    #[arg(
        long,
        value_name = "BOOL",
        env = "INPUT_BUILDWITHCMAKE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub build: Option<bool>,

    #[arg(long = "ninja-path", value_name = "FILE", env = "INPUT_NINJAPATH")]
    pub ninja_path: Option<PathBuf>,

    #[arg(long = "ninja-url", value_name = "URL", env = "INPUT_NINJADOWNLOADURL")]
    pub ninja_url: Option<String>,

    /// Directory ninja downloads are cached in.
    #[arg(long = "ninja-cache", value_name = "DIR")]
    pub ninja_cache: Option<PathBuf>,

    /// Program that runs the configure step with cmake as first argument.
    #[arg(long, value_name = "PROGRAM", env = "INPUT_CMAKEWRAPPERCOMMAND")]
    pub wrapper: Option<PathBuf>,

    #[arg(long = "cmake-path", value_name = "FILE")]
    pub cmake_path: Option<PathBuf>,

    /// `${workspaceRoot}` of CMakeSettings.json.
    #[arg(long = "source-root", value_name = "DIR", env = "GITHUB_WORKSPACE")]
    pub source_root: Option<PathBuf>,

    /// Regexes naming log files to dump, separated by ';'.
    #[arg(
        long = "log-collection-regexps",
        value_name = "REGEX",
        env = "INPUT_LOGCOLLECTIONREGEXPS",
        value_delimiter = ';'
    )]
    pub collect_patterns: Vec<String>,
}

impl CmakeArgs {
    /// Converts the flags that were given to `section.key=value` overrides.
    ///
    /// `collect_patterns` is a list and is applied separately.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        let mut overrides = Vec::new();
        push_override(&mut overrides, "cmake.mode", self.mode.as_ref());
        push_override(&mut overrides, "cmake.lists_file", path(&self.lists_file));
        push_override(&mut overrides, "cmake.settings_file", path(&self.settings_file));
        push_override(&mut overrides, "cmake.generator", self.generator.as_ref());
        push_override(&mut overrides, "cmake.build_type", self.build_type.as_ref());
        push_override(&mut overrides, "cmake.toolchain", path(&self.toolchain));
        push_override(&mut overrides, "cmake.appended_args", self.appended_args.as_ref());
        push_override(&mut overrides, "cmake.build_args", self.build_args.as_ref());
        push_override(
            &mut overrides,
            "cmake.configuration_filter",
            self.configuration_filter.as_ref(),
        );
        push_override(&mut overrides, "cmake.build_dir", path(&self.build_dir));
        push_override(
            &mut overrides,
            "cmake.use_vcpkg_toolchain",
            self.use_vcpkg_toolchain,
        );
        push_override(&mut overrides, "cmake.triplet", self.triplet.as_ref());
        push_override(&mut overrides, "cmake.build", self.build);
        push_override(&mut overrides, "cmake.ninja_path", path(&self.ninja_path));
        push_override(&mut overrides, "cmake.ninja_url", self.ninja_url.as_ref());
        push_override(&mut overrides, "cmake.ninja_cache", path(&self.ninja_cache));
        push_override(&mut overrides, "cmake.wrapper", path(&self.wrapper));
        push_override(&mut overrides, "cmake.cmake_path", path(&self.cmake_path));
        push_override(&mut overrides, "cmake.source_root", path(&self.source_root));
        overrides
    }

    /// Non-empty patterns given on the command line, if any.
    #[must_use]
    pub fn collect_patterns(&self) -> Option<Vec<String>> {
        let patterns: Vec<String> = self
            .collect_patterns
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect();
        (!patterns.is_empty()).then_some(patterns)
    }
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! [vcpkg]  root url commit_id triplet skip_update setup_only
//!          install_target install_command
//! [cmake]  mode lists_file settings_file generator build_type toolchain
//!          appended_args build_args configuration_filter build_dir
//!          use_vcpkg_toolchain triplet build ninja_path ninja_url
//!          ninja_cache wrapper cmake_path source_root
//! [log]    level file_level file json collect_patterns
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cmake::{CmakeMode, GeneratorDescriptor};
use crate::collector::DEFAULT_PATTERNS;
use crate::error::{ConfigError, Result, RunnerError};
use crate::logging::LogLevel;
use crate::vcpkg::DEFAULT_URL;

/// `[vcpkg]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VcpkgConfig {
    /// vcpkg checkout; relative paths resolve against the working directory.
    pub root: PathBuf,
    pub url: String,
    /// Full commit id to pin. May be empty when `root` is a submodule.
    pub commit_id: String,
    /// Default triplet; derived from the host OS when empty.
    pub triplet: String,
    /// Use the checkout as is, without comparing it to `commit_id`.
    pub skip_update: bool,
    /// Bootstrap only, never run `vcpkg install`.
    pub setup_only: bool,
    /// Directory `vcpkg install` runs in. No install when unset.
    pub install_target: Option<PathBuf>,
    /// Replaces `install --recurse --clean-after-build --x-install-root <dir>`.
    pub install_command: String,
}

impl Default for VcpkgConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("vcpkg"),
            url: DEFAULT_URL.to_string(),
            commit_id: String::new(),
            triplet: String::new(),
            skip_update: false,
            setup_only: false,
            install_target: None,
            install_command: String::new(),
        }
    }
}

/// Value of `cmake.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeKind {
    #[default]
    #[serde(rename = "CMakeListsTxtBasic", alias = "basic")]
    Basic,
    #[serde(rename = "CMakeListsTxtAdvanced", alias = "advanced")]
    Advanced,
    #[serde(rename = "CMakeSettingsJson", alias = "settings")]
    Settings,
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Basic => "CMakeListsTxtBasic",
            Self::Advanced => "CMakeListsTxtAdvanced",
            Self::Settings => "CMakeSettingsJson",
        })
    }
}

/// `[cmake]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmakeConfig {
    pub mode: ModeKind,
    pub lists_file: PathBuf,
    pub settings_file: PathBuf,
    /// Generator id such as `Ninja` or `VS16Win64`.
    pub generator: String,
    pub build_type: String,
    pub toolchain: Option<PathBuf>,
    pub appended_args: String,
    pub build_args: String,
    pub configuration_filter: String,
    pub build_dir: Option<PathBuf>,
    pub use_vcpkg_toolchain: bool,
    pub triplet: String,
    /// Run `cmake --build` after configuring.
    pub build: bool,
    pub ninja_path: Option<PathBuf>,
    pub ninja_url: String,
    /// Download cache for ninja; `$RUNNER_TEMP` or the temp dir when unset.
    pub ninja_cache: Option<PathBuf>,
    pub wrapper: Option<PathBuf>,
    pub cmake_path: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
}

impl Default for CmakeConfig {
    fn default() -> Self {
        Self {
            mode: ModeKind::Basic,
            lists_file: PathBuf::from("CMakeLists.txt"),
            settings_file: PathBuf::from("CMakeSettings.json"),
            generator: "Ninja".to_string(),
            build_type: "Debug".to_string(),
            toolchain: None,
            appended_args: String::new(),
            build_args: String::new(),
            configuration_filter: String::new(),
            build_dir: None,
            use_vcpkg_toolchain: false,
            triplet: String::new(),
            build: true,
            ninja_path: None,
            ninja_url: String::new(),
            ninja_cache: None,
            wrapper: None,
            cmake_path: None,
            source_root: None,
        }
    }
}

impl CmakeConfig {
    /// The [`CmakeMode`] this section selects, carrying only its own options.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownGenerator` in basic mode for a generator
    /// outside the catalog.
    pub fn to_mode(&self) -> Result<CmakeMode> {
        Ok(match self.mode {
            ModeKind::Basic => CmakeMode::MinimalLists {
                lists_file: self.lists_file.clone(),
                generator: GeneratorDescriptor::from_id(&self.generator)?,
                build_type: self.build_type.clone(),
                toolchain: self.toolchain.clone(),
                build_args: self.build_args.clone(),
            },
            ModeKind::Advanced => CmakeMode::AdvancedLists {
                lists_file: self.lists_file.clone(),
                appended_args: self.appended_args.clone(),
                build_args: self.build_args.clone(),
            },
            ModeKind::Settings => CmakeMode::SettingsDocument {
                settings_file: self.settings_file.clone(),
                configuration_filter: self.configuration_filter.clone(),
                appended_args: self.appended_args.clone(),
            },
        })
    }
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Console level (0-6).
    pub level: LogLevel,
    /// File level (0-6).
    pub file_level: LogLevel,
    pub file: Option<PathBuf>,
    pub json: bool,
    /// Regexes naming log files to dump; group 1 is the path.
    pub collect_patterns: Vec<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            file_level: LogLevel::TRACE,
            file: None,
            json: false,
            collect_patterns: DEFAULT_PATTERNS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Rejects a blank required string.
pub(super) fn require(section: &str, key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RunnerError::from(ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
            message: "must not be empty".to_string(),
        })
        .into());
    }
    Ok(())
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. run-vcpkg.toml (cwd, optional)
//! 3. --config FILE
//! 4. RUNVCPKG__* env vars
//! 5. CLI flags and --set section.key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! RUNVCPKG__VCPKG__COMMIT_ID=<sha>   → vcpkg.commit_id
//! RUNVCPKG__CMAKE__BUILD_DIR=build   → cmake.build_dir
//! RUNVCPKG__LOG__LEVEL=4             → log.level
//! ```

pub mod loader;
pub mod types;


use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collector::LogFileCollector;
use crate::error::{ConfigError, Result, RunnerError};
use crate::git::Fingerprint;

use loader::ConfigLoader;
use types::{CmakeConfig, LogSettings, ModeKind, VcpkgConfig, require};

/// Default config file looked up in the working directory.
pub const DEFAULT_FILE: &str = "run-vcpkg.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub vcpkg: VcpkgConfig,
    pub cmake: CmakeConfig,
    pub log: LogSettings,
}

impl Config {
    /// Creates a configuration loader.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use run_vcpkg_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("run-vcpkg.toml")
    ///     .with_env_prefix("RUNVCPKG")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Loads configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Loads configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values that deserialization alone cannot.
    ///
    /// Options of the other CMake modes are not checked.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        require("vcpkg", "url", &self.vcpkg.url)?;
        if !self.vcpkg.commit_id.is_empty() {
            self.vcpkg.commit_id.parse::<Fingerprint>().map_err(|e| {
                RunnerError::from(ConfigError::InvalidValue {
                    section: "vcpkg".to_string(),
                    key: "commit_id".to_string(),
                    message: e.to_string(),
                })
            })?;
        }

        match self.cmake.mode {
            ModeKind::Basic => {
                require("cmake", "generator", &self.cmake.generator)?;
                require("cmake", "build_type", &self.cmake.build_type)?;
                self.cmake.to_mode()?;
            }
            ModeKind::Advanced => {}
            ModeKind::Settings => {
                require(
                    "cmake",
                    "settings_file",
                    &self.cmake.settings_file.to_string_lossy(),
                )?;
            }
        }

        LogFileCollector::new(&self.log.collect_patterns)?;
        Ok(())
    }

    /// `key = value` lines for every option, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        let path = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };

        let v = &self.vcpkg;
        options.insert("vcpkg.root", v.root.display().to_string());
        options.insert("vcpkg.url", v.url.clone());
        options.insert("vcpkg.commit_id", v.commit_id.clone());
        options.insert("vcpkg.triplet", v.triplet.clone());
        options.insert("vcpkg.skip_update", v.skip_update.to_string());
        options.insert("vcpkg.setup_only", v.setup_only.to_string());
        options.insert("vcpkg.install_target", path(&v.install_target));
        options.insert("vcpkg.install_command", v.install_command.clone());

        let c = &self.cmake;
        options.insert("cmake.mode", c.mode.to_string());
        options.insert("cmake.lists_file", c.lists_file.display().to_string());
        options.insert("cmake.settings_file", c.settings_file.display().to_string());
        options.insert("cmake.generator", c.generator.clone());
        options.insert("cmake.build_type", c.build_type.clone());
        options.insert("cmake.toolchain", path(&c.toolchain));
        options.insert("cmake.appended_args", c.appended_args.clone());
        options.insert("cmake.build_args", c.build_args.clone());
        options.insert("cmake.configuration_filter", c.configuration_filter.clone());
        options.insert("cmake.build_dir", path(&c.build_dir));
        options.insert("cmake.use_vcpkg_toolchain", c.use_vcpkg_toolchain.to_string());
        options.insert("cmake.triplet", c.triplet.clone());
        options.insert("cmake.build", c.build.to_string());
        options.insert("cmake.ninja_path", path(&c.ninja_path));
        options.insert("cmake.ninja_url", c.ninja_url.clone());
        options.insert("cmake.ninja_cache", path(&c.ninja_cache));
        options.insert("cmake.wrapper", path(&c.wrapper));
        options.insert("cmake.cmake_path", path(&c.cmake_path));
        options.insert("cmake.source_root", path(&c.source_root));

        options.insert("log.level", self.log.level.as_u8().to_string());
        options.insert("log.file_level", self.log.file_level.as_u8().to_string());
        options.insert("log.file", path(&self.log.file));
        options.insert("log.json", self.log.json.to_string());

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);
        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `CMakeSettings.json` mode.
//!
//! ```text
//! CMakeSettings.json
//!   configurations[]  --name matches filter-->  per configuration:
//!     generator            -G<name> [-A<arch>] [-DCMAKE_MAKE_PROGRAM]
//!     configurationType    -DCMAKE_BUILD_TYPE | --config (multi-config)
//!     cmakeToolchain       -DCMAKE_TOOLCHAIN_FILE
//!     variables[]          -D<name>[:<type>]=<value>
//!     cmakeCommandArgs     tokenized, then appended args
//!     buildRoot            build dir (or <build_dir>/<name>)
//!     buildCommandArgs     cmake --build . <args>
//!
//! Expanded: ${workspaceRoot} ${projectDir} ${projectDirName} ${name} ${env.VAR}
//! ```

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use super::args::{build_config_prefix, is_make_program, is_ninja_generator};
use super::session::Session;
use crate::core::env::Env;
use crate::error::{ConfigError, FsError, Result, RunnerError};
use crate::utility::args::split_args;

const SECTION: &str = "cmake";

/// Inputs of a `CMakeSettings.json` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRequest {
    pub settings_file: PathBuf,
    /// Regex; configurations whose name it matches are run.
    pub configuration_filter: String,
    pub appended_args: String,
    /// `${workspaceRoot}`; the directory of the settings file if unset.
    pub source_root: Option<PathBuf>,
    pub triplet: Option<String>,
    pub use_vcpkg_toolchain: bool,
    pub do_build: bool,
    pub ninja_path: Option<PathBuf>,
    pub ninja_url: Option<String>,
    /// Program run in place of cmake for each configure step.
    pub wrapper: Option<PathBuf>,
    /// Overrides every `buildRoot` with `<build_dir>/<name>`.
    pub build_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDocument {
    #[serde(default)]
    configurations: Vec<Configuration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Configuration {
    name: String,
    generator: String,
    configuration_type: String,
    build_root: String,
    cmake_command_args: String,
    build_command_args: String,
    cmake_toolchain: String,
    variables: Vec<Variable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Variable {
    name: String,
    value: serde_json::Value,
    #[serde(rename = "type")]
    kind: String,
}

impl Variable {
    fn to_arg(&self) -> String {
        let value = match &self.value {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        if self.kind.is_empty() {
            format!("-D{}={value}", self.name)
        } else {
            format!("-D{}:{}={value}", self.name, self.kind)
        }
    }
}

/// Splits a legacy `Visual Studio 16 2019 Win64` style name into `-G` and `-A`.
fn split_generator(generator: &str) -> (&str, Option<&'static str>) {
    const SUFFIXES: [(&str, &str); 3] = [(" Win64", "x64"), (" ARM64", "ARM64"), (" ARM", "ARM")];
    if generator.starts_with("Visual Studio") {
        for (suffix, arch) in SUFFIXES {
            if let Some(name) = generator.strip_suffix(suffix) {
                return (name, Some(arch));
            }
        }
    }
    (generator, None)
}

fn is_multi_config(generator: &str) -> bool {
    generator.starts_with("Visual Studio") || generator == "Ninja Multi-Config"
}

/// Variables available to `${...}` macros of one configuration.
struct Macros<'a> {
    workspace_root: String,
    project_dir: String,
    project_dir_name: String,
    name: &'a str,
    session: &'a Session<'a>,
}

impl Macros<'_> {
    fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = &after[..end];
            let value = match key {
                "workspaceRoot" => Some(self.workspace_root.clone()),
                "projectDir" => Some(self.project_dir.clone()),
                "projectDirName" => Some(self.project_dir_name.clone()),
                "name" => Some(self.name.to_string()),
                _ => key
                    .strip_prefix("env.")
                    .map(|var| self.session.host.variable(var).unwrap_or_default()),
            };
            match value {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

/// Runs every matching configuration of a `CMakeSettings.json` file.
pub(crate) struct SettingsRunner<'a> {
    session: Session<'a>,
    request: SettingsRequest,
}

impl<'a> SettingsRunner<'a> {
    pub(super) fn new(mut session: Session<'a>, request: SettingsRequest) -> Self {
        session.wrapper.clone_from(&request.wrapper);
        Self { session, request }
    }

    fn filter(&self) -> Result<Regex> {
        let pattern = if self.request.configuration_filter.is_empty() {
            ".*"
        } else {
            self.request.configuration_filter.as_str()
        };
        Regex::new(pattern).map_err(|e| {
            RunnerError::from(ConfigError::InvalidValue {
                section: SECTION.to_string(),
                key: "configuration_filter".to_string(),
                message: e.to_string(),
            })
            .into()
        })
    }

    fn load(&self) -> Result<SettingsDocument> {
        let path = &self.request.settings_file;
        let text =
            std::fs::read_to_string(path).map_err(|e| RunnerError::from(FsError::io(path, e)))?;
        serde_json::from_str(&text).map_err(|e| {
            RunnerError::from(ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
            .into()
        })
    }

    /// Configures, and builds if requested, each selected configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read, the filter is not a
    /// valid regex or selects nothing, or any CMake step fails.
    pub(crate) async fn run(&self) -> Result<()> {
        let filter = self.filter()?;
        let document = self.load()?;
        let project_dir = std::path::absolute(&self.request.settings_file)
            .map_err(|e| RunnerError::from(FsError::io(&self.request.settings_file, e)))?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let selected: Vec<&Configuration> = document
            .configurations
            .iter()
            .filter(|c| filter.is_match(&c.name))
            .collect();
        if selected.is_empty() {
            return Err(RunnerError::from(ConfigError::InvalidValue {
                section: SECTION.to_string(),
                key: "configuration_filter".to_string(),
                message: format!(
                    "'{}' matches no configuration in {}",
                    filter.as_str(),
                    self.request.settings_file.display()
                ),
            })
            .into());
        }

        for configuration in selected {
            info!(configuration = configuration.name, "running CMakeSettings.json configuration");
            self.run_configuration(configuration, &project_dir).await?;
        }
        Ok(())
    }

    async fn run_configuration(&self, configuration: &Configuration, project_dir: &Path) -> Result<()> {
        let macros = Macros {
            workspace_root: self
                .request
                .source_root
                .as_deref()
                .unwrap_or(project_dir)
                .display()
                .to_string(),
            project_dir: project_dir.display().to_string(),
            project_dir_name: project_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            name: &configuration.name,
            session: &self.session,
        };

        let build_dir = match &self.request.build_dir {
            Some(dir) => dir.join(&configuration.name),
            None if configuration.build_root.is_empty() => {
                project_dir.join("out").join("build").join(&configuration.name)
            }
            None => PathBuf::from(macros.expand(&configuration.build_root)),
        };

        let (program, mut args) = self.session.configure_prefix();
        let generator = macros.expand(&configuration.generator);
        let multi_config = is_multi_config(&generator);
        if !generator.is_empty() {
            let (name, arch) = split_generator(&generator);
            args.push(format!("-G{name}"));
            if let Some(arch) = arch {
                args.push(format!("-A{arch}"));
            }
        }

        let mut extra = split_args(&macros.expand(&configuration.cmake_command_args));
        extra.extend(split_args(&self.request.appended_args));

        let mut combined = args.clone();
        combined.extend(extra.iter().cloned());
        if is_ninja_generator(&combined) && !is_make_program(&combined) {
            let ninja = self
                .session
                .ninja(
                    self.request.ninja_path.as_deref(),
                    self.request.ninja_url.as_deref(),
                )
                .await?;
            args.push(format!("-DCMAKE_MAKE_PROGRAM={}", ninja.display()));
        }

        if !multi_config && !configuration.configuration_type.is_empty() {
            args.push(format!(
                "-DCMAKE_BUILD_TYPE={}",
                configuration.configuration_type
            ));
        }
        if !configuration.cmake_toolchain.is_empty() {
            args.push(format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                macros.expand(&configuration.cmake_toolchain)
            ));
        }
        for variable in &configuration.variables {
            args.push(macros.expand(&variable.to_arg()));
        }
        args.extend(extra);

        let (mut args, env) = if self.request.use_vcpkg_toolchain {
            let setup = self
                .session
                .toolchain(args, self.request.triplet.as_deref())
                .await?;
            (setup.args, setup.env)
        } else {
            (args, Env::new())
        };
        args.push(project_dir.display().to_string());
        debug!(configuration = configuration.name, build_dir = %build_dir.display(), "configuration ready");

        self.session.configure(program, args, &env, &build_dir).await?;
        if self.request.do_build {
            let build_args = macros.expand(&configuration.build_command_args);
            let mut build_line =
                build_config_prefix(&build_args, multi_config, &configuration.configuration_type);
            build_line.push_str(&build_args);
            self.session.build(&build_dir, &build_line, &env).await?;
        }
        Ok(())
    }
}

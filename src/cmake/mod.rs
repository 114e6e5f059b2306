// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CMake driver.
//!
//! ```text
//! CmakeMode
//!   MinimalLists     -G<name> [-A<arch>] [-DCMAKE_MAKE_PROGRAM=<ninja>]
//!                    [-DCMAKE_TOOLCHAIN_FILE=..] [-DCMAKE_BUILD_TYPE=..]
//!   AdvancedLists    [-DCMAKE_MAKE_PROGRAM=<ninja>] <appended args>
//!   SettingsDocument CMakeSettings.json -> SettingsRunner
//!          |
//!          v
//!   [vcpkg toolchain injection]  +  <source dir>
//!          |
//!          v
//!   configure  [matcher cmake]         cwd = build dir
//!          |
//!          v (do_build)
//!   cmake --build . [--config T] args  [matcher from CMakeCache.txt]
//! ```
//!
//! Options that do not apply to the selected mode are ignored.

pub mod args;
pub mod generator;
pub mod matcher;
mod session;
pub mod settings;
pub mod toolchain;


use std::path::{Path, PathBuf};

use tracing::debug;

pub use generator::GeneratorDescriptor;
pub use matcher::{select_matcher, select_matcher_for};
pub use settings::SettingsRequest;

use self::args::{build_config_prefix, is_make_program, is_ninja_generator};
use self::session::Session;
use self::settings::SettingsRunner;
use self::toolchain::ToolchainSetup;
use crate::core::command::CommandRunner;
use crate::core::env::Env;
use crate::core::host::Host;
use crate::core::platform::Platform;
use crate::error::{ConfigError, FsError, ProcessError, Result, RunnerError};
use crate::ninja::ToolLocator;
use crate::utility::args::split_args;
use crate::vcpkg::TRIPLET_VAR;

/// Variable an earlier step may publish with the triplet to build for.
pub const TRIPLET_OVERRIDE_VAR: &str = "RUNVCPKG_VCPKG_TRIPLET";

const SECTION: &str = "cmake";

/// How the project is configured. Each mode carries only its own options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmakeMode {
    /// `CMakeLists.txt` with arguments derived from a generator id.
    MinimalLists {
        lists_file: PathBuf,
        generator: GeneratorDescriptor,
        build_type: String,
        toolchain: Option<PathBuf>,
        build_args: String,
    },
    /// `CMakeLists.txt` with user supplied arguments.
    AdvancedLists {
        lists_file: PathBuf,
        appended_args: String,
        build_args: String,
    },
    /// Configurations from a `CMakeSettings.json` document.
    SettingsDocument {
        settings_file: PathBuf,
        configuration_filter: String,
        appended_args: String,
    },
}

impl CmakeMode {
    /// Minimal mode for the generator `id`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownGenerator` if `id` is not in the catalog.
    pub fn minimal(
        lists_file: impl Into<PathBuf>,
        generator_id: &str,
        build_type: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::MinimalLists {
            lists_file: lists_file.into(),
            generator: GeneratorDescriptor::from_id(generator_id)?,
            build_type: build_type.into(),
            toolchain: None,
            build_args: String::new(),
        })
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MinimalLists { .. } => "CMakeListsTxtBasic",
            Self::AdvancedLists { .. } => "CMakeListsTxtAdvanced",
            Self::SettingsDocument { .. } => "CMakeSettingsJson",
        }
    }
}

/// Options shared by every mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmakeOptions {
    pub build_dir: Option<PathBuf>,
    pub use_vcpkg_toolchain: bool,
    pub triplet: Option<String>,
    pub do_build: bool,
    pub ninja_path: Option<PathBuf>,
    pub ninja_url: Option<String>,
    /// Program run in place of cmake for the configure step.
    pub wrapper: Option<PathBuf>,
    /// Explicit cmake executable; PATH lookup otherwise.
    pub cmake_path: Option<PathBuf>,
    /// Workspace root for `CMakeSettings.json` variable expansion.
    pub source_root: Option<PathBuf>,
}

/// Runs CMake for one [`CmakeMode`].
pub struct CmakeRunner<'a> {
    runner: &'a dyn CommandRunner,
    host: &'a dyn Host,
    locator: &'a dyn ToolLocator,
    platform: Platform,
    mode: CmakeMode,
    options: CmakeOptions,
}

impl<'a> CmakeRunner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        host: &'a dyn Host,
        locator: &'a dyn ToolLocator,
        mode: CmakeMode,
        options: CmakeOptions,
    ) -> Self {
        Self {
            runner,
            host,
            locator,
            platform: Platform::current(),
            mode,
            options,
        }
    }

    #[must_use]
    pub const fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> &CmakeMode {
        &self.mode
    }

    /// Configured triplet, else one published by an earlier step.
    fn triplet(&self) -> Option<String> {
        self.options
            .triplet
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.host.variable(TRIPLET_OVERRIDE_VAR))
            .or_else(|| self.host.variable(TRIPLET_VAR))
            .filter(|t| !t.is_empty())
    }

    fn session(&self) -> Result<Session<'a>> {
        let cmake = match &self.options.cmake_path {
            Some(path) => path.clone(),
            None => self.runner.find_program("cmake").ok_or_else(|| {
                RunnerError::from(ProcessError::ExecutableNotFound {
                    name: "cmake".to_string(),
                })
            })?,
        };
        Ok(Session {
            runner: self.runner,
            host: self.host,
            locator: self.locator,
            platform: self.platform,
            cmake,
            wrapper: self.options.wrapper.clone(),
        })
    }

    fn build_dir(&self) -> Result<&Path> {
        self.options.build_dir.as_deref().ok_or_else(|| {
            RunnerError::from(ConfigError::MissingKey {
                section: SECTION.to_string(),
                key: "build_dir".to_string(),
                message: format!("required in mode '{}'", self.mode.name()),
            })
            .into()
        })
    }

    /// Configures and optionally builds the project.
    ///
    /// # Errors
    ///
    /// Returns an error on missing options, if cmake or ninja cannot be
    /// located, or if configure or build exit non-zero.
    pub async fn run(&self) -> Result<()> {
        debug!(mode = self.mode.name(), "cmake runner starting");
        match &self.mode {
            CmakeMode::SettingsDocument {
                settings_file,
                configuration_filter,
                appended_args,
            } => {
                let request = SettingsRequest {
                    settings_file: settings_file.clone(),
                    configuration_filter: configuration_filter.clone(),
                    appended_args: appended_args.clone(),
                    source_root: self.options.source_root.clone(),
                    triplet: self.triplet(),
                    use_vcpkg_toolchain: self.options.use_vcpkg_toolchain,
                    do_build: self.options.do_build,
                    ninja_path: self.options.ninja_path.clone(),
                    ninja_url: self.options.ninja_url.clone(),
                    wrapper: self.options.wrapper.clone(),
                    build_dir: self.options.build_dir.clone(),
                };
                SettingsRunner::new(self.session()?, request).run().await
            }
            CmakeMode::AdvancedLists {
                lists_file,
                appended_args,
                build_args,
            } => {
                let build_dir = self.build_dir()?;
                let session = self.session()?;
                let (program, mut args) = session.configure_prefix();

                let appended = split_args(appended_args);
                if is_ninja_generator(&appended) && !is_make_program(&appended) {
                    args.push(self.make_program_arg(&session).await?);
                }
                debug!(args = ?appended, "appending args");
                args.extend(appended);

                self.configure_and_build(&session, program, args, lists_file, build_dir, build_args)
                    .await
            }
            CmakeMode::MinimalLists {
                lists_file,
                generator,
                build_type,
                toolchain,
                build_args,
            } => {
                let build_dir = self.build_dir()?;
                let session = self.session()?;
                let (program, mut args) = session.configure_prefix();

                args.push(format!("-G{}", generator.name));
                if let Some(arch) = generator.architecture {
                    args.push(format!("-A{arch}"));
                }
                if generator.is_ninja() {
                    args.push(self.make_program_arg(&session).await?);
                }
                if let Some(toolchain) = toolchain.as_ref().filter(|t| !t.as_os_str().is_empty()) {
                    args.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
                }
                if !generator.multi_config {
                    args.push(format!("-DCMAKE_BUILD_TYPE={build_type}"));
                }
                let mut build_line =
                    build_config_prefix(build_args, generator.multi_config, build_type);
                build_line.push_str(build_args);

                self.configure_and_build(&session, program, args, lists_file, build_dir, &build_line)
                    .await
            }
        }
    }

    async fn make_program_arg(&self, session: &Session<'_>) -> Result<String> {
        let ninja = session
            .ninja(
                self.options.ninja_path.as_deref(),
                self.options.ninja_url.as_deref(),
            )
            .await?;
        Ok(format!("-DCMAKE_MAKE_PROGRAM={}", ninja.display()))
    }

    async fn configure_and_build(
        &self,
        session: &Session<'_>,
        program: PathBuf,
        args: Vec<String>,
        lists_file: &Path,
        build_dir: &Path,
        build_line: &str,
    ) -> Result<()> {
        let setup = if self.options.use_vcpkg_toolchain {
            session.toolchain(args, self.triplet().as_deref()).await?
        } else {
            ToolchainSetup {
                args,
                env: Env::new(),
            }
        };
        let mut args = setup.args;
        args.push(source_dir(lists_file)?.display().to_string());

        session.configure(program, args, &setup.env, build_dir).await?;
        if self.options.do_build {
            session.build(build_dir, build_line, &setup.env).await?;
        }
        Ok(())
    }
}

/// Absolute directory containing `lists_file`.
fn source_dir(lists_file: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(lists_file)
        .map_err(|e| RunnerError::from(FsError::io(lists_file, e)))?;
    Ok(absolute
        .parent()
        .map_or_else(|| absolute.clone(), Path::to_path_buf))
}

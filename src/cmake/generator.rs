// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Generator catalog.
//!
//! ```text
//! id              -G                      -A      multi-config
//! VS16Arm         Visual Studio 16 2019   ARM     yes
//! VS16Win32       Visual Studio 16 2019   Win32   yes
//! VS16Win64       Visual Studio 16 2019   x64     yes
//! VS16Arm64       Visual Studio 16 2019   ARM64   yes
//! VS15Arm         Visual Studio 15 2017   ARM     yes
//! VS15Win32       Visual Studio 15 2017   Win32   yes
//! VS15Win64       Visual Studio 15 2017   x64     yes
//! VS15Arm64       Visual Studio 15 2017   ARM64   yes
//! Ninja           Ninja                   -       no
//! NinjaMulti      Ninja Multi-Config      -       yes
//! UnixMakefiles   Unix Makefiles          -       no
//! ```

use crate::error::{ConfigError, RunnerError, RunnerResult};

/// What a generator id expands to on the CMake command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorDescriptor {
    pub name: &'static str,
    pub architecture: Option<&'static str>,
    pub multi_config: bool,
}

impl GeneratorDescriptor {
    const fn vs(name: &'static str, architecture: &'static str) -> Self {
        Self {
            name,
            architecture: Some(architecture),
            multi_config: true,
        }
    }

    const fn plain(name: &'static str, multi_config: bool) -> Self {
        Self {
            name,
            architecture: None,
            multi_config,
        }
    }

    /// Looks up a generator id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownGenerator` for ids outside the catalog.
    pub fn from_id(id: &str) -> RunnerResult<Self> {
        const VS16: &str = "Visual Studio 16 2019";
        const VS15: &str = "Visual Studio 15 2017";
        Ok(match id {
            "VS16Arm" => Self::vs(VS16, "ARM"),
            "VS16Win32" => Self::vs(VS16, "Win32"),
            "VS16Win64" => Self::vs(VS16, "x64"),
            "VS16Arm64" => Self::vs(VS16, "ARM64"),
            "VS15Arm" => Self::vs(VS15, "ARM"),
            "VS15Win32" => Self::vs(VS15, "Win32"),
            "VS15Win64" => Self::vs(VS15, "x64"),
            "VS15Arm64" => Self::vs(VS15, "ARM64"),
            "Ninja" => Self::plain("Ninja", false),
            "NinjaMulti" => Self::plain("Ninja Multi-Config", true),
            "UnixMakefiles" => Self::plain("Unix Makefiles", false),
            _ => return Err(RunnerError::from(ConfigError::UnknownGenerator(id.to_string()))),
        })
    }

    /// Returns true for `Ninja` and `Ninja Multi-Config`.
    #[must_use]
    pub fn is_ninja(&self) -> bool {
        self.name.starts_with("Ninja")
    }
}

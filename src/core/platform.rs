// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host operating system.

use std::fmt;

/// Operating system family the runner executes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    #[must_use]
    pub const fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// File name of an executable called `stem`.
    #[must_use]
    pub fn exe_name(self, stem: &str) -> String {
        if self.is_windows() {
            format!("{stem}.exe")
        } else {
            stem.to_string()
        }
    }

    /// vcpkg triplet used when none is configured.
    ///
    /// `arch` is a `std::env::consts::ARCH` value.
    #[must_use]
    pub fn default_triplet(self, arch: &str) -> &'static str {
        let arm = arch == "aarch64";
        match self {
            Self::Windows if arm => "arm64-windows",
            Self::Windows => "x64-windows",
            Self::MacOs if arm => "arm64-osx",
            Self::MacOs => "x64-osx",
            Self::Linux if arm => "arm64-linux",
            Self::Linux => "x64-linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Platform;

    #[test]
    fn test_default_triplets() {
        assert_eq!(Platform::Windows.default_triplet("x86_64"), "x64-windows");
        assert_eq!(Platform::MacOs.default_triplet("x86_64"), "x64-osx");
        assert_eq!(Platform::MacOs.default_triplet("aarch64"), "arm64-osx");
        assert_eq!(Platform::Linux.default_triplet("x86_64"), "x64-linux");
        assert_eq!(Platform::Linux.default_triplet("aarch64"), "arm64-linux");
        assert_eq!(Platform::Windows.default_triplet("aarch64"), "arm64-windows");
    }

    #[test]
    fn test_exe_name() {
        assert_eq!(Platform::Windows.exe_name("vcpkg"), "vcpkg.exe");
        assert_eq!(Platform::Linux.exe_name("vcpkg"), "vcpkg");
    }
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build matcher selection from `CMakeCache.txt`.
//!
//! ```text
//! CMakeCache.txt, first CMAKE_CXX_COMPILER: or CMAKE_C_COMPILER: line
//!   g++ | gcc | c++  -> Gcc
//!   cl.exe           -> Msvc
//!   clang            -> Clang
//!   otherwise        -> platform default (Windows Msvc, macOS Clang, Gcc)
//! ```

use std::path::Path;

use tracing::debug;

use crate::core::host::Matcher;
use crate::core::platform::Platform;

/// Name of the cache file CMake writes into the build directory.
pub const CACHE_FILE: &str = "CMakeCache.txt";

const fn default_matcher(platform: Platform) -> Matcher {
    match platform {
        Platform::Windows => Matcher::Msvc,
        Platform::MacOs => Matcher::Clang,
        Platform::Linux => Matcher::Gcc,
    }
}

fn compiler_matcher(line: &str) -> Option<Matcher> {
    if line.contains("g++") || line.contains("gcc") || line.contains("c++") {
        Some(Matcher::Gcc)
    } else if line.contains("cl.exe") {
        Some(Matcher::Msvc)
    } else if line.contains("clang") {
        Some(Matcher::Clang)
    } else {
        None
    }
}

/// Picks the matcher for the compiler configured in `build_dir`.
#[must_use]
pub fn select_matcher(build_dir: &Path) -> Matcher {
    select_matcher_for(build_dir, Platform::current())
}

/// Like [`select_matcher`], with the fallback platform given explicitly.
#[must_use]
pub fn select_matcher_for(build_dir: &Path, platform: Platform) -> Matcher {
    let path = build_dir.join(CACHE_FILE);
    let compiler = match std::fs::read(&path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            text.lines()
                .find(|line| {
                    line.contains("CMAKE_CXX_COMPILER:") || line.contains("CMAKE_C_COMPILER:")
                })
                .and_then(|line| {
                    debug!(line, "found compiler");
                    compiler_matcher(line)
                })
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot read CMake cache");
            None
        }
    };

    let selected = compiler.unwrap_or_else(|| default_matcher(platform));
    debug!(matcher = %selected, "selected build matcher");
    selected
}

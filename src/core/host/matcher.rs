// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Problem matchers understood by the CI host.
//!
//! ```text
//! Matcher      owner    pattern family
//! Gcc          gcc      file:line:col: severity: message
//! Clang        clang    file:line:col: severity: message
//! Msvc         msvc     file(line[,col]): severity CODE: message
//! Cmake        cmake    CMake Error|Warning at file:line (command):
//! All          all      gcc-style, used around whole vcpkg runs
//! ```

use serde_json::{Value, json};

const GNU_PATTERN: &str =
    r"^(.*?):(\d+):(\d*):?\s+(?:fatal\s+)?(warning|error):\s+(.*)$";
const MSVC_PATTERN: &str = r"^(?:\s*\d+>)?([^\s].*)\((\d+),?(\d+)?(?:,\d+,\d+)?\)\s*:\s+(error|warning|info)\s+(\w{1,2}\d+)\s*:\s*(.*)$";
const CMAKE_PATTERN: &str = r"^CMake (Error|Warning)(?: \(dev\))? at ([^:]+):(\d+) ?(.*)$";

/// A named output classifier registered with the CI host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    Gcc,
    Clang,
    Msvc,
    Cmake,
    All,
}

impl Matcher {
    /// Owner name used to register and remove the matcher.
    #[must_use]
    pub const fn owner(self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::Msvc => "msvc",
            Self::Cmake => "cmake",
            Self::All => "all",
        }
    }

    /// Problem-matcher document in the format the Actions runner loads.
    #[must_use]
    pub fn definition(self) -> Value {
        let pattern = match self {
            Self::Gcc | Self::Clang | Self::All => json!({
                "regexp": GNU_PATTERN,
                "file": 1,
                "line": 2,
                "column": 3,
                "severity": 4,
                "message": 5
            }),
            Self::Msvc => json!({
                "regexp": MSVC_PATTERN,
                "file": 1,
                "line": 2,
                "column": 3,
                "severity": 4,
                "code": 5,
                "message": 6
            }),
            Self::Cmake => json!({
                "regexp": CMAKE_PATTERN,
                "severity": 1,
                "file": 2,
                "line": 3,
                "message": 4
            }),
        };
        json!({
            "problemMatcher": [{
                "owner": self.owner(),
                "pattern": [pattern]
            }]
        })
    }
}

impl std::fmt::Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.owner())
    }
}

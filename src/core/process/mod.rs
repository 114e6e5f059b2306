// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning.
//!
//! ```text
//! ProcessBuilder::new("cmake")
//!   .args() .cwd() .env() .capture_stdout() .listener()
//!   .run()
//!       --> tokio::process::Command
//!           stream stdout/stderr line by line
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
mod runner;
#[cfg(test)]
mod tests;

pub use builder::{OutputListener, ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for processes, environment and the CI host.
//!
//! ```text
//!                 core
//!                  |
//!     +--------+---+-----+--------+----------+
//!     |        |         |        |          |
//!     v        v         v        v          v
//!    env    process   command    host     platform
//!     |        |         |        |          |
//!   Env    Builder   Invocation  Host,     Platform
//!          Output    CommandRunner ActionsHost
//!          Listener  SystemRunner  Matcher, MatcherGuard
//! ```

pub mod command;
pub mod env;
pub mod host;
pub mod platform;
pub mod process;

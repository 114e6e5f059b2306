// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |             vcpkg / cmake / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, CLI layers   |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              vcpkg        cmake    collector
//!            bootstrap   configure   log files
//!              |    \      /   \
//!              v     v    v     v
//!             git   toolchain  ninja --> net
//!          gix/CLI             HTTP/zip
//!
//!   +-----------------------------------------+
//!   |  core   process, command, host, env     |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmake;
pub mod cmd;
pub mod collector;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod net;
pub mod ninja;
pub mod utility;
pub mod vcpkg;

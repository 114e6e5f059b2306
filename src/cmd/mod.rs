// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> VcpkgRunner / CmakeRunner
//!                    |
//!                    v
//!   Services: SystemRunner (+ LogFileCollector listener), ActionsHost
//! ```

pub mod cmake;
pub mod config;
pub mod vcpkg;

use std::sync::Arc;

use crate::collector::LogFileCollector;
use crate::config::Config;
use crate::core::command::SystemRunner;
use crate::core::host::ActionsHost;
use crate::error::Result;

/// Process runner and CI host shared by a command.
pub struct Services {
    pub runner: SystemRunner,
    pub host: ActionsHost,
}

impl Services {
    /// Real collaborators; process output feeds the log-file collector.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured collector pattern is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let collector = LogFileCollector::new(&config.log.collect_patterns)?;
        Ok(Self {
            runner: SystemRunner::new().with_listener(Arc::new(collector)),
            host: ActionsHost::from_env(),
        })
    }
}

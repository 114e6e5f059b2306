// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! vcpkg toolchain injection.
//!
//! ```text
//! [..., -DCMAKE_TOOLCHAIN_FILE=user.cmake, ...]
//!                  |
//!                  v
//! [..., ...,
//!  -DVCPKG_CHAINLOAD_TOOLCHAIN_FILE=user.cmake,
//!  -DCMAKE_TOOLCHAIN_FILE=<root>/scripts/buildsystems/vcpkg.cmake,
//!  -DVCPKG_TARGET_TRIPLET=<triplet>]
//!
//! Windows + Ninja: `vcpkg env ... set` -> KEY=VALUE -> Env overlay
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use super::args::is_ninja_generator;
use crate::core::command::{CommandRunner, Invocation};
use crate::core::env::Env;
use crate::core::host::Host;
use crate::core::platform::Platform;
use crate::error::{ProcessError, Result, RunnerError};
use crate::vcpkg::ROOT_VAR;

const TOOLCHAIN_ARG: &str = "-DCMAKE_TOOLCHAIN_FILE";
const CHAINLOAD_ARG: &str = "-DVCPKG_CHAINLOAD_TOOLCHAIN_FILE";

/// Arguments and environment after injection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainSetup {
    pub args: Vec<String>,
    /// Variables to layer over the environment of every CMake process.
    pub env: Env,
}

/// Path of the toolchain file inside a vcpkg root.
#[must_use]
pub fn vcpkg_toolchain_file(root: &Path) -> std::path::PathBuf {
    root.join("scripts").join("buildsystems").join("vcpkg.cmake")
}

/// Replaces the toolchain with vcpkg's, chain-loading any existing one.
///
/// Without a published vcpkg root the arguments are returned unchanged.
///
/// # Errors
///
/// Returns an error if `vcpkg env` cannot run or fails.
pub async fn inject_vcpkg_toolchain(
    args: Vec<String>,
    triplet: Option<&str>,
    runner: &dyn CommandRunner,
    host: &dyn Host,
    platform: Platform,
) -> Result<ToolchainSetup> {
    let Some(root) = host.variable(ROOT_VAR).filter(|root| !root.is_empty()) else {
        warn!(
            variable = ROOT_VAR,
            "vcpkg root is not set, the vcpkg toolchain file is not used"
        );
        return Ok(ToolchainSetup {
            args,
            env: Env::new(),
        });
    };
    let root = Path::new(&root);

    let mut injected = Vec::with_capacity(args.len() + 3);
    let mut chainload = Vec::new();
    for arg in args {
        match arg.strip_prefix(TOOLCHAIN_ARG) {
            Some(rest) => {
                debug!(toolchain = rest, "chain-loading existing toolchain");
                chainload.push(format!("{CHAINLOAD_ARG}{rest}"));
            }
            None => injected.push(arg),
        }
    }
    injected.extend(chainload);
    injected.push(format!(
        "{TOOLCHAIN_ARG}={}",
        vcpkg_toolchain_file(root).display()
    ));
    if let Some(triplet) = triplet {
        injected.push(format!("-DVCPKG_TARGET_TRIPLET={triplet}"));
    }

    let env = if platform.is_windows() && is_ninja_generator(&injected) {
        import_vcpkg_env(root, triplet, runner, platform).await?
    } else {
        Env::new()
    };

    Ok(ToolchainSetup {
        args: injected,
        env,
    })
}

/// Imports the MSVC environment that `vcpkg env` reports for `triplet`.
async fn import_vcpkg_env(
    root: &Path,
    triplet: Option<&str>,
    runner: &dyn CommandRunner,
    platform: Platform,
) -> Result<Env> {
    let Some(triplet) = triplet else {
        warn!("no vcpkg triplet known, the MSVC environment is not imported");
        return Ok(Env::new());
    };

    let exe = root.join(platform.exe_name("vcpkg"));
    let invocation = Invocation::new(exe)
        .args(["env", "--bin", "--include", "--tools", "--python", "--triplet"])
        .arg(triplet)
        .arg("set")
        .capture();
    let output = runner.run(invocation).await?;
    if !output.success() {
        return Err(RunnerError::from(ProcessError::NonZeroExit {
            what: "vcpkg env".to_string(),
            code: output.exit_code(),
        })
        .into());
    }

    let env = Env::parse_assignments(output.stdout());
    info!(triplet, variables = env.len(), "imported environment from vcpkg env");
    Ok(env)
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Vcpkg | Cmake | Options | Version
//! ```

use std::process::ExitCode;

use run_vcpkg_rs::cli::global::GlobalOptions;
use run_vcpkg_rs::cli::{self, Command};
use run_vcpkg_rs::cmd::cmake::run_cmake_command;
use run_vcpkg_rs::cmd::config::run_options_command;
use run_vcpkg_rs::cmd::vcpkg::run_vcpkg_command;
use run_vcpkg_rs::config::loader::ConfigLoader;
use run_vcpkg_rs::config::{Config, DEFAULT_FILE};
use run_vcpkg_rs::error::Result;
use run_vcpkg_rs::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let result = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(command) => run(&cli.global, command).await,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(global: &GlobalOptions, command: &Command) -> Result<()> {
    let (overrides, patterns) = match command {
        Command::Vcpkg(args) => (args.to_config_overrides(), None),
        Command::Cmake(args) => (args.to_config_overrides(), args.collect_patterns()),
        Command::Options | Command::Version => (Vec::new(), None),
    };
    let loader = build_config_loader(global, &overrides, patterns)?;
    let files = loader.format_loaded_files();
    let config = loader.build()?;

    let _log_guard = start_logging(&config)?;
    for file in &files {
        tracing::debug!(file, "loaded configuration");
    }

    match command {
        Command::Vcpkg(_) => run_vcpkg_command(&config).await,
        Command::Cmake(_) => run_cmake_command(&config).await,
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Version => Ok(()),
    }
}

fn build_config_loader(
    global: &GlobalOptions,
    command_overrides: &[String],
    patterns: Option<Vec<String>>,
) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_FILE);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix("RUNVCPKG");
    for assignment in global.to_config_overrides().iter().chain(command_overrides) {
        loader = loader.set_assignment(assignment)?;
    }
    if let Some(patterns) = patterns {
        loader = loader.set("log.collect_patterns", patterns)?;
    }
    Ok(loader)
}

fn start_logging(config: &Config) -> Result<LogGuard> {
    let log_config = LogConfig::builder()
        .with_console_level(config.log.level)
        .with_file_level(config.log.file_level)
        .maybe_with_log_file(config.log.file.as_ref().map(|p| p.display().to_string()))
        .with_json(config.log.json)
        .build();
    init_logging(&log_config)
}

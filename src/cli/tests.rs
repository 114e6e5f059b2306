// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::Parser;

use crate::cli::{Cli, Command};

const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["run-vcpkg", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "run-vcpkg",
        "-l",
        "5",
        "options",
        "--config",
        "ci.toml",
        "--set",
        "cmake.build=false",
    ])
    .unwrap();

    assert!(matches!(cli.command, Some(Command::Options)));
    assert_eq!(cli.global.configs, [std::path::PathBuf::from("ci.toml")]);
    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "cmake.build=false",
        "log.level=5",
        "log.file_level=5",
    ]
    "#);
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["run-vcpkg", "-l", "7", "version"]).is_err());
}

#[test]
fn test_parse_vcpkg() {
    let cli = Cli::try_parse_from([
        "run-vcpkg",
        "vcpkg",
        "--vcpkg-directory",
        "/w/vcpkg",
        "--vcpkg-git-commit-id",
        SHA,
        "--do-not-update-vcpkg",
        "--setup-only",
        "no",
        "--install-command",
        "install --triplet x64-linux",
    ])
    .unwrap();

    let Some(Command::Vcpkg(args)) = cli.command else {
        panic!("expected vcpkg command");
    };
    assert_eq!(
        args.to_config_overrides(),
        [
            "vcpkg.root=/w/vcpkg".to_string(),
            format!("vcpkg.commit_id={SHA}"),
            "vcpkg.skip_update=true".to_string(),
            "vcpkg.setup_only=false".to_string(),
            "vcpkg.install_command=install --triplet x64-linux".to_string(),
        ]
    );
}

#[test]
fn test_parse_cmake() {
    let cli = Cli::try_parse_from([
        "run-vcpkg",
        "cmake",
        "--mode",
        "advanced",
        "--appended-args",
        "-GNinja -DFOO=1",
        "--build-dir",
        "out",
        "--build",
        "false",
        "--use-vcpkg-toolchain",
        "--log-collection-regexps",
        r"(.+\.log);(.+\.txt)",
    ])
    .unwrap();

    let Some(Command::Cmake(args)) = cli.command else {
        panic!("expected cmake command");
    };
    let overrides = args.to_config_overrides();
    for expected in [
        "cmake.mode=advanced",
        "cmake.appended_args=-GNinja -DFOO=1",
        "cmake.build_dir=out",
        "cmake.use_vcpkg_toolchain=true",
        "cmake.build=false",
    ] {
        assert!(overrides.iter().any(|o| o == expected), "{expected} in {overrides:?}");
    }
    assert_eq!(
        args.collect_patterns(),
        Some(vec![r"(.+\.log)".to_string(), r"(.+\.txt)".to_string()])
    );
}

#[test]
fn test_empty_values_are_not_overrides() {
    let cli = Cli::try_parse_from(["run-vcpkg", "vcpkg", "--vcpkg-triplet", ""]).unwrap();
    let Some(Command::Vcpkg(args)) = cli.command else {
        panic!("expected vcpkg command");
    };
    assert!(args.to_config_overrides().iter().all(|o| !o.starts_with("vcpkg.triplet")));
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic `run-vcpkg.toml` files.

use std::path::PathBuf;

use run_vcpkg_rs::cmake::{CmakeMode, GeneratorDescriptor};
use run_vcpkg_rs::config::Config;
use run_vcpkg_rs::config::types::ModeKind;

const SHA: &str = "5568f110b509a9fd90711978a7cb76bae75bb092";

#[test]
fn config_vcpkg_job() {
    let config = Config::parse(&format!(
        r#"
[vcpkg]
root = "${{{{ github.workspace }}}}/vcpkg"
commit_id = "{SHA}"
triplet = "x64-windows-static"
install_target = "."
install_command = "install --triplet x64-windows-static --x-manifest-root ."
"#
    ))
    .unwrap();

    let vcpkg = &config.vcpkg;
    assert_eq!(vcpkg.root, PathBuf::from("${{ github.workspace }}/vcpkg"));
    assert_eq!(vcpkg.url, "https://github.com/microsoft/vcpkg.git");
    assert_eq!(vcpkg.commit_id, SHA);
    assert_eq!(vcpkg.triplet, "x64-windows-static");
    assert!(!vcpkg.skip_update && !vcpkg.setup_only);
    assert_eq!(vcpkg.install_target, Some(PathBuf::from(".")));
    assert_eq!(
        vcpkg.install_command,
        "install --triplet x64-windows-static --x-manifest-root ."
    );
}

#[test]
fn config_basic_mode_job() {
    let config = Config::parse(
        r#"
[cmake]
lists_file = "src/CMakeLists.txt"
generator = "VS16Win64"
build_type = "RelWithDebInfo"
build_dir = "build"
build_args = "-- /m"
use_vcpkg_toolchain = true
"#,
    )
    .unwrap();

    let mode = config.cmake.to_mode().unwrap();
    let CmakeMode::MinimalLists {
        lists_file,
        generator,
        build_type,
        build_args,
        ..
    } = mode
    else {
        panic!("expected basic mode, got {mode:?}");
    };
    assert_eq!(lists_file, PathBuf::from("src/CMakeLists.txt"));
    assert_eq!(generator, GeneratorDescriptor::from_id("VS16Win64").unwrap());
    assert_eq!(build_type, "RelWithDebInfo");
    assert_eq!(build_args, "-- /m");
    assert!(config.cmake.use_vcpkg_toolchain);
}

#[test]
fn config_settings_mode_job() {
    let config = Config::parse(
        r#"
[cmake]
mode = "CMakeSettingsJson"
settings_file = "CMakeSettings.json"
configuration_filter = "^x64-Release$"
appended_args = "-DENABLE_TESTS=ON"
build_dir = "out"

[log]
level = 5
collect_patterns = ['\s*"(.+CMakeOutput\.log)"\.\s*']
"#,
    )
    .unwrap();

    assert_eq!(config.cmake.mode, ModeKind::Settings);
    assert_eq!(
        config.cmake.to_mode().unwrap(),
        CmakeMode::SettingsDocument {
            settings_file: PathBuf::from("CMakeSettings.json"),
            configuration_filter: "^x64-Release$".to_string(),
            appended_args: "-DENABLE_TESTS=ON".to_string(),
        }
    );
    assert_eq!(config.log.collect_patterns.len(), 1);
}

#[test]
fn config_settings_mode_needs_settings_file() {
    let err = Config::parse("[cmake]\nmode = \"settings\"\nsettings_file = \"\"").unwrap_err();
    insta::assert_snapshot!(err, @"config error: missing required input 'settings_file' in section '[cmake]': must not be empty");
}

#[test]
fn config_from_file_layered_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("run-vcpkg.toml");
    std::fs::write(
        &file,
        format!("[vcpkg]\ncommit_id = \"{SHA}\"\nsetup_only = true\n\n[cmake]\nbuild = false\n"),
    )
    .unwrap();

    let config = Config::builder()
        .add_toml_file(&file)
        .set_assignment("cmake.build=true")
        .unwrap()
        .set_assignment("vcpkg.root=/opt/vcpkg")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.vcpkg.commit_id, SHA);
    assert!(config.vcpkg.setup_only);
    assert!(config.cmake.build);
    assert_eq!(config.vcpkg.root, PathBuf::from("/opt/vcpkg"));
    assert!(!Config::from_file(&file).unwrap().cmake.build);
}

// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{BuildRecord, RECORD_FILE_NAME, VcpkgRunner};
use crate::core::command::scripted::ScriptedRunner;
use crate::core::host::Matcher;
use crate::core::host::recording::{MatcherEvent, RecordingHost};
use crate::core::platform::Platform;
use crate::error::RunnerError;
use crate::logging::test_utils::run_with_logs;

const SHA: &str = "0123456789abcdef0123456789abcdef01234567";
const OLD: &str = "fedcba9876543210fedcba9876543210fedcba98";
const URL: &str = "https://example.com/vcpkg.git";

fn vcpkg<'a>(runner: &'a ScriptedRunner, host: &'a RecordingHost, root: &Path) -> VcpkgRunner<'a> {
    VcpkgRunner::new(runner, host, root)
        .platform(Platform::Linux)
        .arch("x86_64")
        .url(URL)
}

/// A root that is a git repository with a built executable and a record.
fn prepared_root(record: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("vcpkg");
    std::fs::create_dir(&root).unwrap();
    gix::init(&root).unwrap();
    std::fs::write(root.join("vcpkg"), "").unwrap();
    std::fs::write(root.join(RECORD_FILE_NAME), record).unwrap();
    (temp, root)
}

fn config_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<RunnerError>()
        .is_some_and(RunnerError::is_config)
}

#[tokio::test]
async fn test_first_run_clones_builds_and_records() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("vcpkg");
    let runner = ScriptedRunner::new()
        .once("git rev-parse", 128, "")
        .on("git rev-parse", 0, SHA);
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root).pin(SHA).unwrap().run().await.unwrap();

    let lines = runner.lines();
    let script = root.join("bootstrap-vcpkg.sh");
    assert_eq!(
        lines,
        [
            "git rev-parse HEAD".to_string(),
            format!("git submodule status {}", root.display()),
            format!("git clone {URL} -n ."),
            format!("git checkout --force {SHA}"),
            format!("sh -c {}", script.display()),
            "git rev-parse HEAD".to_string(),
        ]
    );
    assert_eq!(runner.calls()[2].working_dir().unwrap(), &root);
    assert_eq!(runner.calls()[4].working_dir().unwrap(), &root);
    assert_eq!(
        std::fs::read_to_string(root.join(RECORD_FILE_NAME)).unwrap(),
        SHA
    );
}

#[tokio::test]
async fn test_outputs_published_and_matcher_scoped() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("vcpkg");
    let runner = ScriptedRunner::new();
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root)
        .triplet("x64-linux-dynamic")
        .skip_update(true)
        .run()
        .await
        .unwrap();

    let root_text = root.display().to_string();
    let variables = host.variables();
    assert_eq!(variables["RUNVCPKG_VCPKG_ROOT"], root_text);
    assert_eq!(variables["VCPKG_ROOT"], root_text);
    assert_eq!(variables["RUNVCPKG_VCPKG_DEFAULT_TRIPLET"], "x64-linux-dynamic");
    assert_eq!(variables["VCPKG_DEFAULT_TRIPLET"], "x64-linux-dynamic");
    let outputs = host.outputs();
    assert_eq!(outputs["RUNVCPKG_VCPKG_ROOT_OUT"], root_text);
    assert_eq!(
        outputs["RUNVCPKG_VCPKG_DEFAULT_TRIPLET_OUT"],
        "x64-linux-dynamic"
    );
    assert_eq!(
        host.events(),
        [
            MatcherEvent::Added(Matcher::All),
            MatcherEvent::Removed(Matcher::All)
        ]
    );
}

#[tokio::test]
async fn test_default_triplet_follows_platform() {
    let temp = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &temp.path().join("vcpkg"))
        .platform(Platform::Windows)
        .skip_update(true)
        .run()
        .await
        .unwrap();

    assert_eq!(host.variables()["VCPKG_DEFAULT_TRIPLET"], "x64-windows");
    assert_eq!(runner.count("cmd.exe /c"), 1);
}

#[tokio::test]
async fn test_default_triplet_follows_arch() {
    let temp = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &temp.path().join("vcpkg"))
        .arch("aarch64")
        .skip_update(true)
        .run()
        .await
        .unwrap();

    let variables = host.variables();
    assert_eq!(variables["VCPKG_DEFAULT_TRIPLET"], "arm64-linux");
    assert_eq!(host.outputs()["RUNVCPKG_VCPKG_DEFAULT_TRIPLET_OUT"], "arm64-linux");
}

#[tokio::test]
async fn test_bootstrap_sees_root_and_triplet() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("vcpkg");
    let runner = ScriptedRunner::new();
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root)
        .triplet("x64-linux-release")
        .skip_update(true)
        .run()
        .await
        .unwrap();

    let calls = runner.calls();
    let bootstrap = calls
        .iter()
        .find(|call| call.short_line().starts_with("sh -c"))
        .unwrap();
    let root_text = root.display().to_string();
    let env = bootstrap.environment();
    assert_eq!(env.get("VCPKG_ROOT"), Some(root_text.as_str()));
    assert_eq!(env.get("RUNVCPKG_VCPKG_ROOT"), Some(root_text.as_str()));
    assert_eq!(env.get("VCPKG_DEFAULT_TRIPLET"), Some("x64-linux-release"));
    assert_eq!(
        env.get("RUNVCPKG_VCPKG_DEFAULT_TRIPLET"),
        Some("x64-linux-release")
    );
}

#[tokio::test]
async fn test_missing_pin_is_config_error_after_outputs() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("vcpkg");
    let runner = ScriptedRunner::new();
    let host = RecordingHost::new();

    let err = vcpkg(&runner, &host, &root).run().await.unwrap_err();

    assert!(config_error(&err), "{err:#}");
    insta::assert_snapshot!(
        err.to_string().replace(&root.display().to_string(), "<root>"),
        @"config error: missing required input 'commit_id' in section '[vcpkg]': must be provided when the vcpkg directory (<root>) is not a submodule"
    );
    assert_eq!(runner.count("git clone"), 0);
    assert!(host.variables().contains_key("RUNVCPKG_VCPKG_ROOT"));
    assert_eq!(host.events().last(), Some(&MatcherEvent::Removed(Matcher::All)));
}

#[test]
fn test_invalid_pin_rejected_at_construction() {
    let runner = ScriptedRunner::new();
    let host = RecordingHost::new();

    let err = VcpkgRunner::new(&runner, &host, "/v").pin("2021.05.12").unwrap_err();

    assert!(config_error(&err), "{err:#}");
    assert!(VcpkgRunner::new(&runner, &host, "/v").pin("  ").is_ok());
}

#[tokio::test]
async fn test_empty_url_is_config_error() {
    let temp = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let host = RecordingHost::new();

    let err = vcpkg(&runner, &host, &temp.path().join("vcpkg"))
        .url("")
        .pin(SHA)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(config_error(&err), "{err:#}");
    assert_eq!(runner.count("git clone"), 0);
}

#[tokio::test]
async fn test_submodule_with_pin_warns_once_and_never_clones() {
    let (_temp, root) = prepared_root(SHA);
    let runner = ScriptedRunner::new()
        .on("git rev-parse", 0, SHA)
        .on("git submodule status", 0, &format!(" {SHA} vcpkg"));
    let host = RecordingHost::new();

    let (result, logs) = run_with_logs(|| async {
        vcpkg(&runner, &host, &root).pin(OLD).unwrap().run().await
    })
    .await;

    result.unwrap();
    assert_eq!(logs.warnings(), 1, "{}", logs.as_str());
    assert!(logs.contains("ignored"));
    assert_eq!(runner.count("git clone"), 0);
    assert_eq!(runner.count("git checkout"), 0);
    assert_eq!(runner.count("sh -c"), 0);
}

#[tokio::test]
async fn test_submodule_without_pin_is_silent() {
    let (_temp, root) = prepared_root(SHA);
    let runner = ScriptedRunner::new()
        .on("git rev-parse", 0, SHA)
        .on("git submodule status", 0, &format!(" {SHA} vcpkg"));
    let host = RecordingHost::new();

    let (result, logs) =
        run_with_logs(|| async { vcpkg(&runner, &host, &root).run().await }).await;

    result.unwrap();
    assert_eq!(logs.warnings(), 0, "{}", logs.as_str());
}

#[tokio::test]
async fn test_up_to_date_runs_self_check_only() {
    let (_temp, root) = prepared_root(SHA);
    let runner = ScriptedRunner::new().on("git rev-parse", 0, SHA);
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root).pin(SHA).unwrap().run().await.unwrap();

    assert_eq!(runner.count("vcpkg version"), 1);
    assert_eq!(runner.count("git clone"), 0);
    assert_eq!(runner.count("sh -c"), 0);
}

#[tokio::test]
async fn test_failed_self_check_bootstraps_exactly_once() {
    let (_temp, root) = prepared_root(SHA);
    let runner = ScriptedRunner::new()
        .on("git rev-parse", 0, SHA)
        .on("vcpkg version", 1, "");
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root).pin(SHA).unwrap().run().await.unwrap();

    assert_eq!(runner.count("sh -c"), 1);
    assert_eq!(runner.count("git clone"), 0);
}

#[tokio::test]
async fn test_stale_record_rebuilds_without_self_check() {
    let (_temp, root) = prepared_root(OLD);
    let runner = ScriptedRunner::new().on("git rev-parse", 0, SHA);
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root).pin(SHA).unwrap().run().await.unwrap();

    assert_eq!(runner.count("vcpkg version"), 0);
    assert_eq!(runner.count("sh -c"), 1);
    assert_eq!(
        BuildRecord::in_root(&root).read().await.as_deref(),
        Some(SHA)
    );
}

#[tokio::test]
async fn test_pin_mismatch_reclones() {
    let (_temp, root) = prepared_root(OLD);
    let runner = ScriptedRunner::new().on("git rev-parse", 0, OLD);
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root).pin(SHA).unwrap().run().await.unwrap();

    assert_eq!(runner.count("git clone"), 1);
    assert_eq!(runner.count(&format!("git checkout --force {SHA}")), 1);
    assert_eq!(runner.count("sh -c"), 1);
    assert!(!root.join("vcpkg").exists(), "root was not recreated");
}

#[tokio::test]
async fn test_missing_executable_rebuilds() {
    let (_temp, root) = prepared_root(SHA);
    std::fs::remove_file(root.join("vcpkg")).unwrap();
    let runner = ScriptedRunner::new().on("git rev-parse", 0, SHA);
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root).pin(SHA).unwrap().run().await.unwrap();

    assert_eq!(runner.count("vcpkg version"), 0);
    assert_eq!(runner.count("sh -c"), 1);
}

#[tokio::test]
async fn test_unresolved_commit_writes_empty_record() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("vcpkg");
    let runner = ScriptedRunner::new().on("git rev-parse", 128, "");
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root).pin(SHA).unwrap().run().await.unwrap();

    assert_eq!(
        std::fs::read_to_string(root.join(RECORD_FILE_NAME)).unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_bootstrap_failure_is_fatal_and_keeps_record() {
    let (_temp, root) = prepared_root(OLD);
    let runner = ScriptedRunner::new()
        .on("git rev-parse", 0, SHA)
        .on("sh -c", 3, "");
    let host = RecordingHost::new();

    let err = vcpkg(&runner, &host, &root)
        .pin(SHA)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    insta::assert_snapshot!(
        err.to_string(),
        @"process error: bootstrap-vcpkg failed with error code: '3'"
    );
    assert_eq!(
        std::fs::read_to_string(root.join(RECORD_FILE_NAME)).unwrap(),
        OLD
    );
}

#[tokio::test]
async fn test_install_runs_in_target_with_default_command() {
    let (temp, root) = prepared_root(SHA);
    let target = temp.path().join("project");
    std::fs::create_dir(&target).unwrap();
    let runner = ScriptedRunner::new().on("git rev-parse", 0, SHA);
    let host = RecordingHost::new();

    vcpkg(&runner, &host, &root)
        .pin(SHA)
        .unwrap()
        .install_target(&target)
        .run()
        .await
        .unwrap();

    let calls = runner.calls();
    let install = calls.last().unwrap();
    assert_eq!(install.working_dir().unwrap(), &target);
    assert_eq!(install.program(), &root.join("vcpkg"));
    assert_eq!(
        install.arg_list(),
        [
            "install".to_string(),
            "--recurse".to_string(),
            "--clean-after-build".to_string(),
            "--x-install-root".to_string(),
            target.display().to_string(),
        ]
    );
    let root_text = root.display().to_string();
    assert_eq!(install.environment().get("VCPKG_ROOT"), Some(root_text.as_str()));
    assert_eq!(
        install.environment().get("VCPKG_DEFAULT_TRIPLET"),
        Some("x64-linux")
    );

    let self_check = calls
        .iter()
        .find(|call| call.arg_list() == ["version"])
        .unwrap();
    assert_eq!(
        self_check.environment().get("VCPKG_ROOT"),
        Some(root_text.as_str())
    );
}

#[tokio::test]
async fn test_install_command_override_is_tokenized() {
    let (temp, root) = prepared_root(SHA);
    let target = temp.path().join("project");
    std::fs::create_dir(&target).unwrap();
    let runner = ScriptedRunner::new()
        .on("git rev-parse", 0, SHA)
        .on("vcpkg install", 2, "");
    let host = RecordingHost::new();

    let err = vcpkg(&runner, &host, &root)
        .pin(SHA)
        .unwrap()
        .install_target(&target)
        .install_command(r#"install --triplet x64-linux "--overlay-ports=my ports""#)
        .run()
        .await
        .unwrap_err();

    insta::assert_snapshot!(
        err.to_string(),
        @"process error: vcpkg install failed with error code: '2'"
    );
    assert_eq!(
        runner.calls().last().unwrap().arg_list(),
        ["install", "--triplet", "x64-linux", "--overlay-ports=my ports"]
    );
}

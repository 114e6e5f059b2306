// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::{Arc, Mutex};

use super::builder::{OutputListener, ProcessBuilder, ProcessFlags};
use crate::core::env::Env;
use crate::error::{ProcessError, RunnerError};

#[derive(Default)]
struct Lines(Mutex<Vec<String>>);

impl OutputListener for Lines {
    fn on_line(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

#[cfg(not(windows))]
fn sh(script: &str) -> ProcessBuilder {
    ProcessBuilder::new("/bin/sh").arg("-c").arg(script)
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .capture_stdout()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout(), @"hello");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_exit_code_allowed() {
    let output = sh("exit 42")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .run()
        .await
        .expect("process should complete");

    assert_eq!(output.exit_code(), 42);
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_exit_code_rejected() {
    let err = sh("exit 3").run().await.unwrap_err();

    let runner = err.downcast_ref::<RunnerError>().expect("typed error");
    assert!(matches!(
        runner,
        RunnerError::Process(p) if matches!(**p, ProcessError::NonZeroExit { code: 3, .. })
    ));
    insta::assert_snapshot!(err.to_string(), @"process error: sh failed with error code: '3'");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_env_overlay_keeps_inherited() {
    let mut env = Env::new();
    env.set("RUNVCPKG_TEST_VAR", "test_value");

    let output = sh("echo \"$RUNVCPKG_TEST_VAR:${PATH:+has-path}\"")
        .env(env)
        .capture_stdout()
        .run()
        .await
        .expect("process should succeed");

    insta::assert_snapshot!(output.stdout(), @"test_value:has-path");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_listener_sees_both_streams() {
    let lines = Arc::new(Lines::default());

    sh("echo out; echo err 1>&2")
        .listener(lines.clone())
        .run()
        .await
        .expect("process should succeed");

    let mut seen = lines.0.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, ["err", "out"]);
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_capture_survives_many_lines_and_bad_utf8() {
    let output = sh("i=0; while [ $i -lt 500 ]; do echo line$i; i=$((i+1)); done; printf 'bad\\377tail\\n'")
        .capture_stdout()
        .run()
        .await
        .expect("process should succeed");

    let lines: Vec<_> = output.stdout().lines().collect();
    assert_eq!(lines.len(), 501);
    assert_eq!(lines[499], "line499");
    assert!(lines[500].starts_with("bad") && lines[500].ends_with("tail"));
}

#[tokio::test]
async fn test_spawn_failure_is_typed() {
    let err = ProcessBuilder::new("nonexistent_program_12345")
        .run()
        .await
        .unwrap_err();

    let runner = err.downcast_ref::<RunnerError>().expect("typed error");
    assert!(matches!(
        runner,
        RunnerError::Process(p) if matches!(**p, ProcessError::SpawnFailed { .. })
    ));
}

#[test]
fn test_executable_lookup_not_found() {
    assert!(ProcessBuilder::find("nonexistent_program_12345").is_none());
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("cmake").args(["-GNinja Multi-Config", "-S", "."]);
    insta::assert_snapshot!(builder.command_line(), @r#"cmake "-GNinja Multi-Config" -S ."#);
}

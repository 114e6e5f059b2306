// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{
    Fingerprint, checkout_force, clone_no_checkout, is_git_repo, is_linked_submodule,
    resolve_fingerprint,
};
use crate::core::command::scripted::ScriptedRunner;
use crate::error::{GitError, RunnerError};

const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

#[test]
fn test_fingerprint_accepts_full_lowercase_sha() {
    for valid in [SHA, "ffffffffffffffffffffffffffffffffffffffff"] {
        assert!(Fingerprint::is_valid(valid), "{valid}");
        assert_eq!(valid.parse::<Fingerprint>().unwrap().as_str(), valid);
    }
}

#[test]
fn test_fingerprint_rejects_everything_else() {
    let too_long = format!("{SHA}0");
    let invalid = [
        "",
        "0123456",
        &SHA[..39],
        too_long.as_str(),
        "0123456789ABCDEF0123456789abcdef01234567",
        "g123456789abcdef0123456789abcdef01234567",
        " 123456789abcdef0123456789abcdef01234567",
    ];
    for value in invalid {
        assert!(!Fingerprint::is_valid(value), "{value:?}");
        assert!(value.parse::<Fingerprint>().is_err(), "{value:?}");
    }
    insta::assert_snapshot!(
        "zz".parse::<Fingerprint>().unwrap_err().to_string(),
        @"'zz' must be a full SHA1 hash (40 hex digits)"
    );
}

#[test]
fn test_fingerprint_deserialize_validates() {
    let ok: Fingerprint = serde_json::from_str(&format!("\"{SHA}\"")).unwrap();
    assert_eq!(ok.as_str(), SHA);
    assert!(serde_json::from_str::<Fingerprint>("\"main\"").is_err());
}

#[tokio::test]
async fn test_resolve_fingerprint_trims_stdout() {
    let runner = ScriptedRunner::new().on("git rev-parse HEAD", 0, &format!("{SHA}\n"));

    let fingerprint = resolve_fingerprint(&runner, Path::new("git"), Path::new("/v")).await;

    assert_eq!(fingerprint.as_ref().map(Fingerprint::as_str), Some(SHA));
    let call = &runner.calls()[0];
    assert_eq!(call.working_dir().unwrap(), Path::new("/v"));
    assert!(call.is_captured());
    assert_eq!(call.environment().get("GIT_TERMINAL_PROMPT"), Some("0"));
}

#[tokio::test]
async fn test_resolve_fingerprint_failure_is_none() {
    let failing = ScriptedRunner::new().on("git rev-parse", 128, "");
    let garbage = ScriptedRunner::new().on("git rev-parse", 0, "HEAD");

    assert!(resolve_fingerprint(&failing, Path::new("git"), Path::new("/v")).await.is_none());
    assert!(resolve_fingerprint(&garbage, Path::new("git"), Path::new("/v")).await.is_none());
}

#[tokio::test]
async fn test_is_linked_submodule_needs_output() {
    let dir = Path::new("/work/vcpkg");
    let linked = ScriptedRunner::new().on(
        "git submodule status",
        0,
        &format!(" {SHA} vcpkg (2021.05.12)"),
    );
    let empty = ScriptedRunner::new().on("git submodule status", 0, "");
    let failing = ScriptedRunner::new().on("git submodule status", 128, "fatal");

    assert!(is_linked_submodule(&linked, Path::new("git"), dir).await);
    assert!(!is_linked_submodule(&empty, Path::new("git"), dir).await);
    assert!(!is_linked_submodule(&failing, Path::new("git"), dir).await);

    let call = &linked.calls()[0];
    assert_eq!(call.working_dir().unwrap(), Path::new("/work"));
    assert_eq!(call.arg_list().last().unwrap(), "/work/vcpkg");
}

#[tokio::test]
async fn test_clone_and_checkout_arguments() {
    let runner = ScriptedRunner::new();
    let pin: Fingerprint = SHA.parse().unwrap();

    clone_no_checkout(&runner, Path::new("git"), "https://example.com/vcpkg.git", Path::new("/v"))
        .await
        .unwrap();
    checkout_force(&runner, Path::new("git"), Path::new("/v"), &pin)
        .await
        .unwrap();

    assert_eq!(
        runner.lines(),
        [
            "git clone https://example.com/vcpkg.git -n .".to_string(),
            format!("git checkout --force {SHA}"),
        ]
    );
}

#[tokio::test]
async fn test_checkout_failure_is_typed() {
    let runner = ScriptedRunner::new().on("git checkout", 1, "");
    let pin: Fingerprint = SHA.parse().unwrap();

    let err = checkout_force(&runner, Path::new("git"), Path::new("/v"), &pin)
        .await
        .unwrap_err();

    let Some(RunnerError::Git(git)) = err.downcast_ref::<RunnerError>() else {
        panic!("expected git error, got {err}");
    };
    assert!(matches!(**git, GitError::CheckoutFailed { code: 1, .. }));
}

#[test]
fn test_is_git_repo_only_for_repository_root() {
    let temp = tempfile::tempdir().unwrap();
    let nested = temp.path().join("nested");
    std::fs::create_dir(&nested).unwrap();

    assert!(!is_git_repo(temp.path()));

    gix::init(temp.path()).expect("failed to init repo");

    assert!(is_git_repo(temp.path()));
    assert!(!is_git_repo(&nested));
}

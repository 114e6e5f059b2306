// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::{Cursor, Write};
use std::path::Path;

use super::{NinjaLocator, ToolLocator, archive, cache_key, default_url};
use crate::core::platform::Platform;
use crate::net::ProgressDisplay;

fn zip_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    for (name, body) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_default_urls_pin_release() {
    insta::assert_snapshot!(
        default_url(Platform::Linux),
        @"https://github.com/ninja-build/ninja/releases/download/v1.10.2/ninja-linux.zip"
    );
    assert!(default_url(Platform::Windows).ends_with("/v1.10.2/ninja-win.zip"));
    assert!(default_url(Platform::MacOs).ends_with("/v1.10.2/ninja-mac.zip"));
}

#[test]
fn test_cache_key_is_path_safe_and_distinct() {
    let key = cache_key("https://example.com/ninja/v1.10.2/ninja-linux.zip");
    assert_eq!(key, "example.com_ninja_v1.10.2_ninja-linux.zip");
    assert_ne!(
        cache_key("https://a.example/ninja.zip"),
        cache_key("https://b.example/ninja.zip")
    );
}

#[tokio::test]
async fn test_explicit_path_is_returned_verbatim() {
    let temp = tempfile::tempdir().unwrap();
    let locator = NinjaLocator::new(temp.path());

    let path = locator
        .resolve_path(Some(Path::new("relative/ninja")), Some("http://unused"))
        .await
        .unwrap();

    assert_eq!(path, Path::new("relative/ninja"));
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cached_executable_is_reused_without_network() {
    let temp = tempfile::tempdir().unwrap();
    let url = "http://127.0.0.1:9/ninja-linux.zip";
    let dir = temp.path().join(cache_key(url));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("ninja"), "").unwrap();
    let locator = NinjaLocator::new(temp.path())
        .platform(Platform::Linux)
        .progress(ProgressDisplay::Silent);

    let path = locator
        .resolve_path(Some(Path::new("")), Some(url))
        .await
        .unwrap();

    assert_eq!(path, dir.join("ninja"));
}

#[test]
fn test_unpack_zip_and_find_nested_file() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("tool.zip");
    std::fs::write(
        &zip_path,
        zip_with(&[("bin/ninja", b"#!/bin/sh\n"), ("README", b"readme")]),
    )
    .unwrap();
    let dest = temp.path().join("out");

    archive::unpack_zip(&zip_path, &dest).unwrap();

    assert_eq!(
        archive::find_file(&dest, "ninja"),
        Some(dest.join("bin").join("ninja"))
    );
    assert!(archive::find_file(&dest, "missing").is_none());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dest.join("bin").join("ninja"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn test_unpack_rejects_garbage() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("broken.zip");
    std::fs::write(&zip_path, b"not a zip").unwrap();

    let err = archive::unpack_zip(&zip_path, temp.path()).unwrap_err();

    assert!(err.to_string().contains("failed to extract"), "{err:#}");
}

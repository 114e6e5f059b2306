// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Log capture for unit tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Captured log output.
pub(crate) struct CapturedLogs(String);

impl CapturedLogs {
    /// Number of lines logged at `WARN`.
    pub(crate) fn warnings(&self) -> usize {
        self.0.lines().filter(|line| line.contains("WARN")).count()
    }

    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Runs an async closure while capturing tracing output at `DEBUG` and above.
///
/// The closure's own result is returned untouched next to the logs, so
/// failing runs can still be inspected.
pub(crate) async fn run_with_logs<F, Fut, T>(f: F) -> (T, CapturedLogs)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .without_time()
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    let result = f().await;

    let text = buffer
        .lock()
        .map(|guard| String::from_utf8_lossy(&guard).to_string())
        .unwrap_or_default();
    (result, CapturedLogs(text))
}

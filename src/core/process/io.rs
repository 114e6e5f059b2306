// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks
//!     each line --> trace! / println! / listener / String
//!   wait
//!   join readers
//!   --> ProcessOutput { exit_code, stdout, stderr }
//! ```
//!
//! Lines are split on `\n` and decoded lossily, so a stray non-UTF-8 byte
//! never stops the reader and stalls the child on a full pipe.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{OutputListener, ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::Result;

struct StreamReader {
    flags: StreamFlags,
    process_name: String,
    stream_name: &'static str,
    listener: Option<Arc<dyn OutputListener>>,
}

impl StreamReader {
    fn spawn<R>(self, reader: Option<R>) -> Option<JoinHandle<String>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        reader.map(|reader| tokio::spawn(async move { self.read(reader).await }))
    }

    async fn read<R>(self, reader: R) -> String
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut kept = String::new();
        let mut raw = Vec::new();

        loop {
            raw.clear();
            match reader.read_until(b'\n', &mut raw).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&raw);
                    let line = text.trim_end_matches(['\n', '\r']);
                    self.handle_line(line, &mut kept);
                }
                Err(e) => {
                    warn!(
                        process = %self.process_name,
                        stream = self.stream_name,
                        error = %e,
                        "error reading stream"
                    );
                    break;
                }
            }
        }
        kept
    }

    fn handle_line(&self, line: &str, kept: &mut String) {
        if self.flags.contains(StreamFlags::FORWARD_TO_LOG) {
            trace!(process = %self.process_name, stream = self.stream_name, line = %line, "output");
        }
        if self.flags.contains(StreamFlags::ECHO) {
            println!("{line}");
        }
        if let Some(listener) = &self.listener {
            listener.on_line(line);
        }
        if self.flags.contains(StreamFlags::KEEP_IN_STRING) {
            if !kept.is_empty() {
                kept.push('\n');
            }
            kept.push_str(line);
        }
    }
}

async fn join(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

impl ProcessBuilder {
    /// Streams the child's output until it exits.
    pub(super) async fn run_child(&self, name: &str, child: &mut Child) -> Result<ProcessOutput> {
        let stdout = StreamReader {
            flags: self.stdout_stream(),
            process_name: name.to_string(),
            stream_name: "stdout",
            listener: self.output_listener(),
        }
        .spawn(child.stdout.take());
        let stderr = StreamReader {
            flags: self.stderr_stream(),
            process_name: name.to_string(),
            stream_name: "stderr",
            listener: self.output_listener(),
        }
        .spawn(child.stderr.take());

        let status = child.wait().await?;
        let stdout = join(stdout).await;
        let stderr = join(stderr).await;

        Ok(ProcessOutput::new(
            status.code().unwrap_or(-1),
            stdout,
            stderr,
        ))
    }
}

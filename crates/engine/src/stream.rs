// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental log tailing into the log-record sink.
//!
//! Each forwarded line is committed by the sink on its own, so a crash
//! mid-stream loses at most the unflushed tail of the file, never lines
//! already forwarded.

use bo_adapters::LogSink;
use bo_core::LogId;
use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;

/// Pause between polls when the file has no new data.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Tails a growing log file and forwards new lines to a sink record.
pub struct LogStreamer<'a, S: LogSink> {
    sink: &'a S,
    id: &'a LogId,
}

impl<'a, S: LogSink> LogStreamer<'a, S> {
    pub fn new(sink: &'a S, id: &'a LogId) -> Self {
        Self { sink, id }
    }

    /// Post-hoc mode: the producing process has already exited. Read the
    /// file from the start once, forwarding every line.
    pub async fn stream_post_hoc(&self, path: &Path) -> std::io::Result<()> {
        let file = tokio::fs::File::open(path).await?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            self.forward(&line).await;
        }
    }

    /// Live mode: poll from the current file position while the process
    /// runs, pausing briefly when no new data is available, then flush the
    /// remainder once exit is observed. Returns the exit status.
    pub async fn stream_live(&self, path: &Path, child: &mut Child) -> std::io::Result<ExitStatus> {
        let file = tokio::fs::File::open(path).await?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                if let Some(status) = child.try_wait()? {
                    // Final read to catch anything written between the
                    // last poll and process exit.
                    loop {
                        line.clear();
                        if reader.read_line(&mut line).await? == 0 {
                            return Ok(status);
                        }
                        self.forward(&line).await;
                    }
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            } else {
                self.forward(&line).await;
            }
        }
    }

    /// Forward one line. Sink failures must not break the task; they are
    /// traced and the stream continues.
    async fn forward(&self, line: &str) {
        if let Err(e) = self.sink.append_log(self.id, line).await {
            tracing::warn!(id = %self.id, error = %e, "failed to append log line");
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;

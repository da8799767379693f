// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure taxonomy for bench operations.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by task launch and supervision.
///
/// Validation failures abort before any process is spawned; process and
/// timeout failures are converted into a terminal log status at the task
/// boundary and never left unhandled.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Missing required input or credential. No side effect has occurred.
    #[error("{0}")]
    Validation(String),

    /// External command failed; message carries the captured output.
    #[error("process failed: {0}")]
    Process(String),

    /// Process exceeded its allotted duration and was force-killed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TaskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TaskError::Validation(msg.into())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation log records: audit trail for long-running bench operations.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};

/// Status of an operation log record.
///
/// Transitions monotonically: `InProcess` → `Success` or `Error`.
/// Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    InProcess,
    Success,
    Error,
}

impl LogStatus {
    /// Check if this status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, LogStatus::Success | LogStatus::Error)
    }
}

crate::simple_display! {
    LogStatus {
        InProcess => "In Process",
        Success => "Success",
        Error => "Error",
    }
}

/// Kind of bench operation a log record tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateSite,
    BackupSite,
    RestoreSite,
    DropSite,
    StartBench,
    StopBench,
}

crate::simple_display! {
    ActionKind {
        CreateSite => "Create Site",
        BackupSite => "Backup Site",
        RestoreSite => "Restore Site",
        DropSite => "Drop Site",
        StartBench => "Start Bench",
        StopBench => "Stop Bench",
    }
}

/// Time-based identifier for a log record: `"{action}-{unix_ts}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(String);

impl LogId {
    /// Generate an id for the given action at the clock's current time.
    pub fn new<C: Clock>(action: ActionKind, clock: &C) -> Self {
        Self(format!("{}-{}", action, clock.epoch_secs()))
    }

    /// Create an id from an existing string (for parsing/deserialization).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Audit trail for one long-running operation.
///
/// The `log` field is append-only; `status` moves once from `InProcess`
/// to a terminal value. Appends and status changes after a terminal
/// transition are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: LogId,
    pub title: String,
    pub log: String,
    pub timestamp: u64,
    pub status: LogStatus,
    pub action: ActionKind,
}

impl LogRecord {
    /// Create a fresh record in the `InProcess` state.
    pub fn new<C: Clock>(action: ActionKind, title: impl Into<String>, clock: &C) -> Self {
        Self {
            id: LogId::new(action, clock),
            title: title.into(),
            log: String::new(),
            timestamp: clock.epoch_secs(),
            status: LogStatus::InProcess,
            action,
        }
    }

    /// Append output to the log. No-op once the record is terminal.
    pub fn append(&mut self, text: &str) {
        if !self.status.is_terminal() {
            self.log.push_str(text);
        }
    }

    /// Transition to a terminal status. Ignored if already terminal.
    pub fn finalize(&mut self, status: LogStatus) {
        if !self.status.is_terminal() {
            self.status = status;
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;

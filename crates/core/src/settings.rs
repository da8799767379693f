// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator settings threaded explicitly into the engine.
//!
//! There is intentionally no process-wide settings singleton; callers
//! construct a [`Settings`] (typically from their settings store) and pass
//! it by parameter into scans and task launches.

use crate::error::TaskError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Credentials and paths required by bench operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory scanned for bench installations.
    pub bench_root: PathBuf,
    /// Password fed to the privilege-escalation prompt over stdin.
    pub sudo_password: Option<String>,
    /// Database root password passed to site lifecycle commands.
    pub db_root_password: Option<String>,
}

impl Settings {
    pub fn new(bench_root: impl Into<PathBuf>) -> Self {
        Self { bench_root: bench_root.into(), sudo_password: None, db_root_password: None }
    }

    /// Sudo password, or a validation error if not configured.
    pub fn require_sudo_password(&self) -> Result<&str, TaskError> {
        self.sudo_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| TaskError::validation("Sudo password not configured"))
    }

    /// Database root password, or a validation error if not configured.
    pub fn require_db_root_password(&self) -> Result<&str, TaskError> {
        self.db_root_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| TaskError::validation("Database root password not configured"))
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

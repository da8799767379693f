// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bench inventory model produced by the directory scanner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for one installed application inside a bench.
///
/// `title` is resolved by the scanner with a fixed priority: hooks-file
/// declaration, then manifest name, then prettified folder name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub name: String,
    pub title: String,
    pub branch: Option<String>,
    pub version: Option<String>,
    pub commit: Option<String>,
    pub repo_url: Option<String>,
}

/// One site (tenant) hosted inside a bench.
///
/// `apps` is the subset of the bench's installed apps that are installed
/// on this site, keyed by app name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub name: String,
    pub path: PathBuf,
    pub apps: Vec<AppDescriptor>,
}

/// Result of scanning one valid bench directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchEntry {
    pub name: String,
    pub path: PathBuf,
    /// Runtime version, lifted from the framework app's probe entry.
    pub version: Option<String>,
    /// Runtime branch, lifted from the framework app's probe entry.
    pub branch: Option<String>,
    pub apps: Vec<AppDescriptor>,
    pub sites: Vec<SiteEntry>,
    pub is_error: bool,
    pub error_message: Option<String>,
}

impl BenchEntry {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            version: None,
            branch: None,
            apps: Vec::new(),
            sites: Vec::new(),
            is_error: false,
            error_message: None,
        }
    }

    /// Record a probe failure. First error wins; later failures for the
    /// same bench do not overwrite the message.
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.error_message.is_none() {
            self.is_error = true;
            self.error_message = Some(message.into());
        }
    }

    /// Look up an installed app by name.
    pub fn app(&self, name: &str) -> Option<&AppDescriptor> {
        self.apps.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
#[path = "bench_tests.rs"]
mod tests;

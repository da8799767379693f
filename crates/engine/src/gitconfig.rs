// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream repository URL extraction from a checkout's git config.
//!
//! The parser tolerates the malformed configs seen in the wild: duplicate
//! keys within a section (last one wins) and unknown sections are fine.
//! A missing or unreadable config degrades to `None`.

use std::collections::HashMap;
use std::path::Path;

/// Remote URL for the app checkout, preferring `upstream` over `origin`.
pub fn remote_url(app_path: &Path) -> Option<String> {
    let config_path = app_path.join(".git").join("config");
    let text = std::fs::read_to_string(config_path).ok()?;
    let remotes = parse_remote_urls(&text);
    remotes.get("upstream").or_else(|| remotes.get("origin")).cloned()
}

/// Map of remote name → url from git-config-style text.
fn parse_remote_urls(text: &str) -> HashMap<String, String> {
    let mut remotes = HashMap::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            current = line
                .strip_prefix("[remote \"")
                .and_then(|rest| rest.strip_suffix("\"]"))
                .map(str::to_string);
            continue;
        }
        let Some(remote) = &current else {
            continue;
        };
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "url" {
                remotes.insert(remote.clone(), value.trim().to_string());
            }
        }
    }
    remotes
}

#[cfg(test)]
#[path = "gitconfig_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App display-title resolution.
//!
//! Priority: title declared in the app's hooks file, then the project
//! manifest name, then the prettified folder name. Missing or malformed
//! files degrade to the next source, never to an error.

use std::path::Path;

/// Resolve a human-readable title for an app checked out at `app_path`.
pub fn resolve_title(app_path: &Path, app_name: &str) -> String {
    if let Some(title) = hooks_title(&app_path.join(app_name).join("hooks.py")) {
        return title;
    }
    if let Some(name) = manifest_name(&app_path.join("pyproject.toml")) {
        return prettify(&name);
    }
    prettify(app_name)
}

/// Statically extract the `app_title` string-literal assignment from a
/// hooks source file. Anything but a plain quoted literal is ignored.
fn hooks_title(hooks_path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(hooks_path).ok()?;
    for line in text.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("app_title") else {
            continue;
        };
        let Some(value) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let value = value.trim();
        let Some(literal) = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        else {
            continue;
        };
        let literal = literal.trim();
        if !literal.is_empty() {
            return Some(literal.to_string());
        }
    }
    None
}

/// Extract the project name from a manifest supporting both the
/// `[project]` and `[tool.poetry]` shapes. Falls back to a naive line
/// scan when the document does not parse as TOML.
fn manifest_name(manifest_path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(manifest_path).ok()?;
    match text.parse::<toml::Table>() {
        Ok(doc) => {
            let project_name = doc
                .get("project")
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str());
            let poetry_name = doc
                .get("tool")
                .and_then(|t| t.get("poetry"))
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str());
            project_name.or(poetry_name).map(str::to_string)
        }
        Err(_) => text.lines().find_map(|line| {
            let rest = line.trim().strip_prefix("name")?;
            let value = rest.trim_start().strip_prefix('=')?;
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then(|| value.to_string())
        }),
    }
}

/// `"my-app_name"` → `"My App Name"`.
fn prettify(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bench discovery and metadata scanning.
//!
//! Walks a root directory, identifies valid bench installations (a
//! `sites/` subdirectory plus a `Procfile`), and probes each through the
//! bench CLI for installed apps, runtime version, and per-site app sets.
//! The scan tolerates partially broken installations: one malformed bench
//! or site never blanks out data for its siblings.

use crate::{gitconfig, manifest};
use bo_adapters::CommandRunner;
use bo_core::{AppDescriptor, BenchEntry, SiteEntry};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from individual probes. Never propagated out of the scan;
/// aggregated into per-bench error flags instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The probe command itself failed.
    #[error("{message}")]
    Probe { message: String },

    /// The probe ran but its output could not be parsed.
    #[error("unable to parse probe output as JSON or literal")]
    Parse,
}

/// One app entry from the bench-wide version probe.
#[derive(Debug, Deserialize)]
struct ProbeApp {
    app: String,
    branch: Option<String>,
    version: Option<String>,
    commit: Option<String>,
}

/// Probe output comes in two shapes: a plain list of app entries, or a
/// mapping keyed by bench name whose value holds the list. Resolved once
/// at the parse boundary into a canonical entry list.
enum AppsOutput {
    List(Vec<Value>),
    Keyed(serde_json::Map<String, Value>),
}

impl AppsOutput {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => AppsOutput::List(items),
            Value::Object(map) => AppsOutput::Keyed(map),
            _ => AppsOutput::List(Vec::new()),
        }
    }

    fn into_entries(self) -> Vec<Value> {
        match self {
            AppsOutput::List(items) => items,
            AppsOutput::Keyed(map) => map
                .into_iter()
                .find_map(|(_, v)| match v {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .unwrap_or_default(),
        }
    }
}

/// Directory scanner producing a bench inventory.
pub struct BenchScanner<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> BenchScanner<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Scan a root directory for benches. A nonexistent root yields an
    /// empty inventory, not an error.
    pub async fn scan(&self, root: &Path) -> Vec<BenchEntry> {
        let root = expand_home(root);
        let root = match root.canonicalize() {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "scan root does not exist");
                return Vec::new();
            }
        };

        let entries = match std::fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "scan root unreadable");
                return Vec::new();
            }
        };

        let mut benches = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_bench(&path) {
                continue;
            }
            benches.push(self.scan_bench(&path).await);
        }
        benches
    }

    /// Scan one valid bench directory. Probe failures are recorded on the
    /// entry (first error wins) and never abort the bench.
    async fn scan_bench(&self, path: &Path) -> BenchEntry {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut bench = BenchEntry::new(name, path.to_path_buf());

        match self.probe_bench_apps(path).await {
            Ok(probed) => {
                for probe in probed {
                    let app_path = path.join("apps").join(&probe.app);
                    if probe.app == "frappe" {
                        bench.version = probe.version.clone();
                        bench.branch = probe.branch.clone();
                    }
                    bench.apps.push(AppDescriptor {
                        title: manifest::resolve_title(&app_path, &probe.app),
                        repo_url: gitconfig::remote_url(&app_path),
                        name: probe.app,
                        branch: probe.branch,
                        version: probe.version,
                        commit: probe.commit,
                    });
                }
            }
            Err(e) => {
                bench.record_error(format!(
                    "{} - bench version --format json - {e}",
                    path.display()
                ));
            }
        }

        for site_name in site_dirs(&path.join("sites")) {
            let site_path = path.join("sites").join(&site_name);
            let apps = match self.probe_site_apps(path, &site_name).await {
                Ok(names) => names
                    .iter()
                    .filter_map(|n| bench.app(n).cloned())
                    .collect(),
                Err(e) => {
                    bench.record_error(format!(
                        "{} - bench --site {site_name} list-apps --format json - {e}",
                        path.display()
                    ));
                    Vec::new()
                }
            };
            bench.sites.push(SiteEntry { name: site_name, path: site_path, apps });
        }

        bench
    }

    /// Bench-wide app probe. Empty output is a valid empty inventory.
    async fn probe_bench_apps(&self, bench_path: &Path) -> Result<Vec<ProbeApp>, ScanError> {
        let raw = self
            .runner
            .run("bench version --format json", Some(bench_path))
            .await
            .map_err(|e| ScanError::Probe { message: e.to_string() })?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let value = robust_parse(&raw)?;
        Ok(AppsOutput::from_value(value)
            .into_entries()
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<ProbeApp>(entry).ok())
            .collect())
    }

    /// Site-scoped app list. Unparseable output degrades to an empty
    /// list; only command failure is an error.
    async fn probe_site_apps(
        &self,
        bench_path: &Path,
        site_name: &str,
    ) -> Result<Vec<String>, ScanError> {
        let cmd = format!("bench --site {site_name} list-apps --format json");
        let raw = self
            .runner
            .run(&cmd, Some(bench_path))
            .await
            .map_err(|e| ScanError::Probe { message: e.to_string() })?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let value = match robust_parse(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    site = site_name,
                    error = %e,
                    raw,
                    "site app probe returned unparseable output"
                );
                return Ok(Vec::new());
            }
        };

        let list = match value {
            Value::Object(map) => map
                .get(site_name)
                .cloned()
                .filter(Value::is_array)
                .or_else(|| map.into_iter().map(|(_, v)| v).find(Value::is_array))
                .and_then(|v| match v {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .unwrap_or_default(),
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        Ok(list
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }
}

/// A directory is a bench iff it has a `sites/` subdirectory and a
/// `Procfile`. Anything else is silently excluded.
fn is_bench(path: &Path) -> bool {
    path.is_dir() && path.join("sites").is_dir() && path.join("Procfile").is_file()
}

/// Site subdirectories, excluding the reserved `assets` folder.
fn site_dirs(sites_path: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(sites_path) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "assets")
        .collect();
    names.sort();
    names
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Parse probe output that is usually JSON but sometimes wrapped in
/// noise or printed as a quasi-literal structure. Ladder: strict JSON,
/// then the bracketed array substring, then a permissive literal fixup.
fn robust_parse(raw: &str) -> Result<Value, ScanError> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) {
        if end > start {
            if let Ok(value) = serde_json::from_str(&raw[start..=end]) {
                return Ok(value);
            }
        }
    }

    serde_json::from_str(&literal_fixup(raw)).map_err(|_| ScanError::Parse)
}

/// Rewrite a Python-literal-shaped structure into JSON: single quotes
/// become double quotes and the bare constants map to their JSON forms.
fn literal_fixup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut word = String::new();
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        flush_word(&mut out, &mut word);
        out.push(if c == '\'' { '"' } else { c });
    }
    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    match word.as_str() {
        "True" => out.push_str("true"),
        "False" => out.push_str("false"),
        "None" => out.push_str("null"),
        other => out.push_str(other),
    }
    word.clear();
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Port reclamation: find the ports a bench's services are configured on
//! and evict whatever still holds them.

use bo_adapters::ports::{redis_shutdown, PortKiller, REDIS_PORT_RANGE};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

/// Best-effort eviction of processes from a bench's service ports.
pub struct PortReclaimer {
    killer: PortKiller,
}

impl PortReclaimer {
    pub fn new(killer: PortKiller) -> Self {
        Self { killer }
    }

    /// Collect candidate ports from the bench's Redis configs and every
    /// site's config, then free each one that is occupied. Returns the
    /// full candidate list — what was attempted, not an in-use census.
    pub async fn reclaim(&self, bench_path: &Path) -> Vec<u16> {
        let mut candidates = BTreeSet::new();
        candidates.extend(read_redis_ports(&bench_path.join("config")));
        candidates.extend(read_site_ports(&bench_path.join("sites")));

        let ports: Vec<u16> = candidates.into_iter().collect();
        for &port in &ports {
            self.stop_port(port).await;
        }
        ports
    }

    /// Returns true if the port was occupied and an eviction was issued.
    async fn stop_port(&self, port: u16) -> bool {
        match std::net::TcpListener::bind(("127.0.0.1", port)) {
            // Bind succeeded: the port is free, nothing to do.
            Ok(_) => false,
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                if REDIS_PORT_RANGE.contains(&port) {
                    // Plausibly Redis: ask nicely before the hard kill.
                    redis_shutdown(port).await;
                }
                self.killer.kill(port).await;
                true
            }
            // Any other bind error is treated as "not in use"; this is
            // best-effort cleanup, never escalated.
            Err(e) => {
                tracing::debug!(port, error = %e, "port probe failed");
                false
            }
        }
    }
}

/// Extract `port` directives from `redis_*.conf` files in the config dir.
fn read_redis_ports(config_dir: &Path) -> Vec<u16> {
    let mut ports = Vec::new();
    let Ok(entries) = std::fs::read_dir(config_dir) else {
        return ports;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !(name.starts_with("redis_") && name.ends_with(".conf")) {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        for line in text.lines() {
            let mut parts = line.split_whitespace();
            if parts.next() == Some("port") {
                if let Some(port) = parts.next().and_then(|p| p.parse().ok()) {
                    ports.push(port);
                    break;
                }
            }
        }
    }
    ports
}

/// Extract `webserver_port`/`socketio_port` from each site's config.
fn read_site_ports(sites_dir: &Path) -> Vec<u16> {
    let mut ports = Vec::new();
    let Ok(entries) = std::fs::read_dir(sites_dir) else {
        return ports;
    };
    for entry in entries.flatten() {
        let config_path = entry.path().join("site_config.json");
        let Ok(text) = std::fs::read_to_string(&config_path) else {
            continue;
        };
        let Ok(config) = serde_json::from_str::<serde_json::Value>(&text) else {
            continue;
        };
        for key in ["webserver_port", "socketio_port"] {
            if let Some(port) = config.get(key).and_then(|v| v.as_u64()) {
                if let Ok(port) = u16::try_from(port) {
                    ports.push(port);
                }
            }
        }
    }
    ports
}

#[cfg(test)]
#[path = "reclaim_tests.rs"]
mod tests;

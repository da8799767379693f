// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS utilities for evicting processes from TCP ports.

use crate::subprocess::run_cmd;
use std::time::Duration;

/// Port range where an occupant is plausibly a Redis instance and is
/// offered a graceful shutdown before the hard kill.
pub const REDIS_PORT_RANGE: std::ops::RangeInclusive<u16> = 1100..=14000;

/// Platform-specific mechanism for killing whatever holds a port.
///
/// Selected once at startup by platform probe instead of branching at
/// every call site.
#[derive(Debug, Clone)]
pub enum PortKiller {
    /// Linux: `fuser <port>/tcp -k`
    Fuser,
    /// Other POSIX: `lsof` the port and `kill` the owning pids
    LsofKill,
    /// Records the attempt instead of issuing it.
    #[cfg(any(test, feature = "test-support"))]
    Recording(KillLog),
}

impl PortKiller {
    /// Pick the mechanism for the current platform.
    pub fn for_platform() -> Self {
        if cfg!(target_os = "linux") {
            PortKiller::Fuser
        } else {
            PortKiller::LsofKill
        }
    }

    /// Force-kill whatever process holds the port. Best effort: failures
    /// are traced and swallowed.
    pub async fn kill(&self, port: u16) {
        let cmd = match self {
            PortKiller::Fuser => format!("fuser {port}/tcp -k"),
            PortKiller::LsofKill => {
                format!("lsof -i tcp:{port} | grep -v PID | awk '{{print $2}}' | xargs kill")
            }
            #[cfg(any(test, feature = "test-support"))]
            PortKiller::Recording(log) => {
                log.record(port);
                return;
            }
        };
        if let Err(e) = run_cmd(&cmd, None).await {
            tracing::debug!(port, error = %e, "port kill command failed");
        }
    }
}

/// Ask a Redis instance on the port to shut down, then give it a moment.
/// Best effort: a dead or non-Redis endpoint is not an error.
pub async fn redis_shutdown(port: u16) {
    let cmd = format!("echo 'shutdown' | redis-cli -h 127.0.0.1 -p {port} 2>/dev/null");
    if let Err(e) = run_cmd(&cmd, None).await {
        tracing::debug!(port, error = %e, "redis shutdown request failed");
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Shared log of eviction attempts for the recording killer.
    #[derive(Debug, Clone, Default)]
    pub struct KillLog {
        ports: Arc<Mutex<Vec<u16>>>,
    }

    impl KillLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub(super) fn record(&self, port: u16) {
            self.ports.lock().push(port);
        }

        /// Ports an eviction was issued for, in attempt order.
        pub fn killed(&self) -> Vec<u16> {
            self.ports.lock().clone()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::KillLog;

#[cfg(test)]
#[path = "ports_tests.rs"]
mod tests;

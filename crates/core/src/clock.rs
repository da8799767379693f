// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use std::time::{SystemTime, UNIX_EPOCH};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync {
    /// Seconds since the Unix epoch.
    fn epoch_secs(&self) -> u64;
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Fake clock for testing with controllable time
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct FakeClock {
    epoch_secs: std::sync::Arc<parking_lot::Mutex<u64>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeClock {
    pub fn new(epoch_secs: u64) -> Self {
        Self { epoch_secs: std::sync::Arc::new(parking_lot::Mutex::new(epoch_secs)) }
    }

    /// Advance the clock by the given number of seconds
    pub fn advance(&self, secs: u64) {
        *self.epoch_secs.lock() += secs;
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for FakeClock {
    fn epoch_secs(&self) -> u64 {
        *self.epoch_secs.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_nonzero_epoch() {
    let clock = SystemClock;
    assert!(clock.epoch_secs() > 1_600_000_000);
}

#[test]
fn fake_clock_starts_at_given_epoch() {
    let clock = FakeClock::new(1_724_000_000);
    assert_eq!(clock.epoch_secs(), 1_724_000_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new(100);
    clock.advance(60);
    assert_eq!(clock.epoch_secs(), 160);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new(100);
    let other = clock.clone();
    clock.advance(5);
    assert_eq!(other.epoch_secs(), 105);
}

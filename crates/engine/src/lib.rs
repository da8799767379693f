// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bo-engine: bench operation engine.
//!
//! Supervises long-running bench commands as background tasks with
//! near-real-time log streaming, scans directory trees for bench/site/app
//! inventory, and frees the ports a bench's services hold.

pub mod actions;
mod gitconfig;
mod manifest;
pub mod reclaim;
pub mod scan;
pub mod stream;
pub mod sync;
pub mod task;

pub use actions::Actions;
pub use reclaim::PortReclaimer;
pub use scan::{BenchScanner, ScanError};
pub use stream::LogStreamer;
pub use sync::sync_benches;
pub use task::{ManagedTask, TaskSpec};

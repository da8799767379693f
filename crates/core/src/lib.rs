// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bo-core: domain types for the benchops administration core

pub mod macros;

pub mod bench;
pub mod clock;
pub mod error;
pub mod log;
pub mod response;
pub mod settings;

pub use bench::{AppDescriptor, BenchEntry, SiteEntry};
pub use clock::{Clock, SystemClock};
pub use error::TaskError;
pub use log::{ActionKind, LogId, LogRecord, LogStatus};
pub use response::ActionResponse;
pub use settings::Settings;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;

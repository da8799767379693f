// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bo-adapters: boundaries to external collaborators.
//!
//! Each trait here represents one external system the engine talks to:
//! the document store holding log and inventory records, the background
//! job queue, the desktop notifier, and the OS utilities used to free
//! ports. Fakes for all of them live behind the `test-support` feature.

pub mod notify;
pub mod ports;
pub mod queue;
pub mod store;
pub mod subprocess;

pub use notify::{DesktopNotifier, NoopNotifier, Notifier, NotifyError};
pub use ports::PortKiller;
pub use queue::{JobQueue, QueueError, TokioJobQueue};
pub use store::{LogSink, RecordStore, StoreError};
pub use subprocess::{run_cmd, CommandRunner, ProcessError, ShellRunner};

#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifier, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use ports::KillLog;
#[cfg(any(test, feature = "test-support"))]
pub use queue::FakeJobQueue;
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeLogSink, FakeRecordStore, StoredSite};
#[cfg(any(test, feature = "test-support"))]
pub use subprocess::FakeRunner;

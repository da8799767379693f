// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Realtime operator notifications for background task outcomes.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for sending notifications
#[async_trait]
pub trait Notifier: Clone + Send + Sync + 'static {
    /// Send a notification with a title and message body
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let title = title.to_string();
        let message = message.to_string();
        // Notification::show() is synchronous; fire-and-forget on tokio's
        // bounded blocking pool so the worker never stalls on the desktop.
        tokio::task::spawn_blocking(move || {
            if let Err(e) =
                notify_rust::Notification::new().summary(&title).body(&message).show()
            {
                tracing::warn!(%title, error = %e, "desktop notification failed");
            }
        });
        Ok(())
    }
}

/// Notifier that drops everything. Useful where no desktop session exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _title: &str, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{Notifier, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded notification
    #[derive(Debug, Clone)]
    pub struct NotifyCall {
        pub title: String,
        pub message: String,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifier {
        calls: Arc<Mutex<Vec<NotifyCall>>>,
    }

    impl FakeNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded notifications
        pub fn calls(&self) -> Vec<NotifyCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
            self.calls
                .lock()
                .push(NotifyCall { title: title.to_string(), message: message.to_string() });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifier, NotifyCall};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background job queue boundary.
//!
//! The engine hands each long-running task to the host's job facility and
//! never awaits or retries it; outcome is reported only through the task's
//! log record.

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors from job enqueueing.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to enqueue job: {0}")]
    Enqueue(String),
}

/// Fire-and-forget scheduler for background tasks.
pub trait JobQueue: Clone + Send + Sync + 'static {
    fn enqueue<F>(&self, job: F) -> Result<(), QueueError>
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Queue that runs each job as a detached tokio task.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioJobQueue;

impl JobQueue for TokioJobQueue {
    fn enqueue<F>(&self, job: F) -> Result<(), QueueError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(job);
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type BoxedJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

    /// Queue that holds jobs until the test drives them explicitly.
    #[derive(Clone, Default)]
    pub struct FakeJobQueue {
        jobs: Arc<Mutex<Vec<BoxedJob>>>,
    }

    impl FakeJobQueue {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of jobs waiting to run.
        pub fn pending(&self) -> usize {
            self.jobs.lock().len()
        }

        /// Run every enqueued job to completion, in enqueue order.
        pub async fn run_all(&self) {
            loop {
                let job = {
                    let mut jobs = self.jobs.lock();
                    if jobs.is_empty() {
                        break;
                    }
                    jobs.remove(0)
                };
                job.await;
            }
        }
    }

    impl JobQueue for FakeJobQueue {
        fn enqueue<F>(&self, job: F) -> Result<(), QueueError>
        where
            F: Future<Output = ()> + Send + 'static,
        {
            self.jobs.lock().push(Box::pin(job));
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeJobQueue;

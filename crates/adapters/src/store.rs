// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document-store boundaries: the log-record sink and the bench/site
//! inventory store.
//!
//! Both are owned by the host framework; this crate only defines the
//! narrow surface the engine needs. Every mutation is independently
//! durable once it returns — a crash mid-operation loses at most the
//! update in flight, never previously committed ones.

use async_trait::async_trait;
use bo_core::{AppDescriptor, BenchEntry, LogId, LogRecord, LogStatus, SiteEntry};
use std::path::Path;
use thiserror::Error;

/// Errors from the external document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Backend(String),
}

/// Sink for operation log records.
#[async_trait]
pub trait LogSink: Clone + Send + Sync + 'static {
    /// Create a fresh record. Idempotent on id.
    async fn create(&self, record: LogRecord) -> Result<(), StoreError>;

    /// Append text to a record's log. Each call commits on its own.
    async fn append_log(&self, id: &LogId, text: &str) -> Result<(), StoreError>;

    /// Set a record's status. Each call commits on its own.
    async fn set_status(&self, id: &LogId, status: LogStatus) -> Result<(), StoreError>;
}

/// Persistent bench/site/app inventory.
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    async fn upsert_bench(&self, entry: &BenchEntry) -> Result<(), StoreError>;

    async fn upsert_app(&self, app: &AppDescriptor) -> Result<(), StoreError>;

    async fn find_bench(&self, name: &str) -> Result<Option<BenchEntry>, StoreError>;

    async fn upsert_site(
        &self,
        bench_name: &str,
        bench_path: &Path,
        site: &SiteEntry,
    ) -> Result<(), StoreError>;

    async fn remove_site(&self, bench_name: &str, site_name: &str) -> Result<(), StoreError>;

    async fn find_site(
        &self,
        bench_name: &str,
        site_name: &str,
    ) -> Result<Option<SiteEntry>, StoreError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;

    /// In-memory log sink for tests. Applies the same append-only and
    /// one-shot status semantics the real store guarantees.
    #[derive(Clone, Default)]
    pub struct FakeLogSink {
        records: Arc<Mutex<HashMap<LogId, LogRecord>>>,
    }

    impl FakeLogSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of a record by id.
        pub fn record(&self, id: &LogId) -> Option<LogRecord> {
            self.records.lock().get(id).cloned()
        }

        /// Snapshot of all records.
        pub fn records(&self) -> Vec<LogRecord> {
            self.records.lock().values().cloned().collect()
        }
    }

    #[async_trait]
    impl LogSink for FakeLogSink {
        async fn create(&self, record: LogRecord) -> Result<(), StoreError> {
            self.records.lock().entry(record.id.clone()).or_insert(record);
            Ok(())
        }

        async fn append_log(&self, id: &LogId, text: &str) -> Result<(), StoreError> {
            let mut records = self.records.lock();
            let record = records
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            record.append(text);
            Ok(())
        }

        async fn set_status(&self, id: &LogId, status: LogStatus) -> Result<(), StoreError> {
            let mut records = self.records.lock();
            let record = records
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            record.finalize(status);
            Ok(())
        }
    }

    /// Recorded site row in the fake inventory store.
    #[derive(Debug, Clone)]
    pub struct StoredSite {
        pub bench_name: String,
        pub bench_path: PathBuf,
        pub site: SiteEntry,
    }

    #[derive(Default)]
    struct FakeRecordState {
        benches: Vec<BenchEntry>,
        apps: Vec<AppDescriptor>,
        sites: Vec<StoredSite>,
    }

    /// In-memory inventory store for tests.
    #[derive(Clone, Default)]
    pub struct FakeRecordStore {
        state: Arc<Mutex<FakeRecordState>>,
    }

    impl FakeRecordStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn benches(&self) -> Vec<BenchEntry> {
            self.state.lock().benches.clone()
        }

        pub fn apps(&self) -> Vec<AppDescriptor> {
            self.state.lock().apps.clone()
        }

        pub fn sites(&self) -> Vec<StoredSite> {
            self.state.lock().sites.clone()
        }
    }

    #[async_trait]
    impl RecordStore for FakeRecordStore {
        async fn upsert_bench(&self, entry: &BenchEntry) -> Result<(), StoreError> {
            let mut state = self.state.lock();
            match state.benches.iter_mut().find(|b| b.name == entry.name) {
                Some(existing) => *existing = entry.clone(),
                None => state.benches.push(entry.clone()),
            }
            Ok(())
        }

        async fn upsert_app(&self, app: &AppDescriptor) -> Result<(), StoreError> {
            let mut state = self.state.lock();
            match state.apps.iter_mut().find(|a| a.name == app.name) {
                Some(existing) => *existing = app.clone(),
                None => state.apps.push(app.clone()),
            }
            Ok(())
        }

        async fn find_bench(&self, name: &str) -> Result<Option<BenchEntry>, StoreError> {
            Ok(self.state.lock().benches.iter().find(|b| b.name == name).cloned())
        }

        async fn upsert_site(
            &self,
            bench_name: &str,
            bench_path: &Path,
            site: &SiteEntry,
        ) -> Result<(), StoreError> {
            let mut state = self.state.lock();
            let row = StoredSite {
                bench_name: bench_name.to_string(),
                bench_path: bench_path.to_path_buf(),
                site: site.clone(),
            };
            match state
                .sites
                .iter_mut()
                .find(|s| s.bench_name == bench_name && s.site.name == site.name)
            {
                Some(existing) => *existing = row,
                None => state.sites.push(row),
            }
            Ok(())
        }

        async fn remove_site(&self, bench_name: &str, site_name: &str) -> Result<(), StoreError> {
            self.state
                .lock()
                .sites
                .retain(|s| !(s.bench_name == bench_name && s.site.name == site_name));
            Ok(())
        }

        async fn find_site(
            &self,
            bench_name: &str,
            site_name: &str,
        ) -> Result<Option<SiteEntry>, StoreError> {
            Ok(self
                .state
                .lock()
                .sites
                .iter()
                .find(|s| s.bench_name == bench_name && s.site.name == site_name)
                .map(|s| s.site.clone()))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLogSink, FakeRecordStore, StoredSite};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

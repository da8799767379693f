// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the end-to-end specs.

pub use bo_adapters::{
    FakeJobQueue, FakeLogSink, FakeNotifier, FakeRecordStore, FakeRunner, JobQueue, RecordStore,
};
pub use bo_core::{ActionKind, FakeClock, LogRecord, LogStatus, Settings};
pub use bo_engine::{Actions, BenchScanner, ManagedTask, TaskSpec};
pub use std::path::{Path, PathBuf};
pub use std::time::Duration;

/// In-memory collaborators wired the way the host would wire the real ones.
pub struct Harness {
    pub sink: FakeLogSink,
    pub store: FakeRecordStore,
    pub notifier: FakeNotifier,
    pub queue: FakeJobQueue,
    pub clock: FakeClock,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            sink: FakeLogSink::new(),
            store: FakeRecordStore::new(),
            notifier: FakeNotifier::new(),
            queue: FakeJobQueue::new(),
            clock: FakeClock::new(1_700_000_000),
        }
    }

    pub fn task(&self) -> ManagedTask<FakeLogSink, FakeRecordStore, FakeNotifier, FakeClock> {
        ManagedTask::new(
            self.sink.clone(),
            self.store.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }

    pub fn actions(
        &self,
        settings: Settings,
    ) -> Actions<FakeLogSink, FakeRecordStore, FakeNotifier, FakeJobQueue, FakeClock> {
        Actions::new(
            self.sink.clone(),
            self.store.clone(),
            self.notifier.clone(),
            self.queue.clone(),
            self.clock.clone(),
            settings,
        )
    }

    /// The single record created by the last task, by scan order.
    pub fn only_record(&self) -> LogRecord {
        let records = self.sink.records();
        assert_eq!(records.len(), 1, "expected exactly one log record");
        records.into_iter().next().unwrap()
    }
}

/// Spec running `script` through the shell inside `bench_path`.
pub fn shell_spec(
    action: ActionKind,
    bench_path: &Path,
    site_name: &str,
    script: &str,
) -> TaskSpec {
    TaskSpec {
        action,
        bench_name: "mybench".to_string(),
        bench_path: bench_path.to_path_buf(),
        site_name: site_name.to_string(),
        argv: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        secret: None,
        timeout: Some(Duration::from_secs(10)),
        title: format!("{action} - {site_name}"),
    }
}

pub fn settings_with_credentials(root: &Path) -> Settings {
    Settings {
        bench_root: root.to_path_buf(),
        sudo_password: Some("hunter2".to_string()),
        db_root_password: Some("root-pw".to_string()),
    }
}

/// A minimal valid bench directory: `sites/` plus a `Procfile`.
pub fn make_bench(root: &Path, name: &str) -> PathBuf {
    let bench = root.join(name);
    std::fs::create_dir_all(bench.join("sites")).unwrap();
    std::fs::write(bench.join("Procfile"), "web: bench serve\n").unwrap();
    bench
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Site lifecycle specs: supervised processes end to end.

use crate::prelude::*;

#[tokio::test]
async fn successful_backup_reaches_success_and_cleans_up() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let spec = shell_spec(
        ActionKind::BackupSite,
        bench.path(),
        "foo.localhost",
        "printf 'ok\\n'",
    );

    harness.task().run(spec).await;

    let record = harness.only_record();
    assert_eq!(record.status, LogStatus::Success);
    assert!(record.log.contains("ok"));

    // The scratch log file never outlives the task.
    assert!(!bench.path().join("bench_backup_site_foo.localhost.log").exists());

    let calls = harness.notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Backup Site Success");
}

#[tokio::test]
async fn failing_command_ends_in_error_with_captured_output() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let spec = shell_spec(
        ActionKind::BackupSite,
        bench.path(),
        "foo.localhost",
        "echo boom >&2; exit 3",
    );

    harness.task().run(spec).await;

    let record = harness.only_record();
    assert_eq!(record.status, LogStatus::Error);
    assert!(record.log.contains("boom"));
    assert!(!bench.path().join("bench_backup_site_foo.localhost.log").exists());
}

#[tokio::test]
async fn timeout_kills_the_process_and_annotates_the_log() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let mut spec = shell_spec(ActionKind::BackupSite, bench.path(), "foo.localhost", "sleep 30");
    spec.timeout = Some(Duration::from_millis(200));

    harness.task().run(spec).await;

    let record = harness.only_record();
    assert_eq!(record.status, LogStatus::Error);
    assert!(record.log.contains("Timed out while taking backup!"));
    assert!(!bench.path().join("bench_backup_site_foo.localhost.log").exists());
}

#[tokio::test]
async fn live_tailed_create_registers_the_site_record() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let mut spec = shell_spec(
        ActionKind::CreateSite,
        bench.path(),
        "new.localhost",
        "echo 'site created'",
    );
    spec.timeout = None; // live tail until exit

    harness.task().run(spec).await;

    let record = harness.only_record();
    assert_eq!(record.status, LogStatus::Success);
    assert!(record.log.contains("site created"));

    let sites = harness.store.sites();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].bench_name, "mybench");
    assert_eq!(sites[0].site.name, "new.localhost");
}

#[tokio::test]
async fn successful_drop_removes_the_site_record() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let site = bo_core::SiteEntry {
        name: "old.localhost".to_string(),
        path: bench.path().join("sites/old.localhost"),
        apps: Vec::new(),
    };
    harness.store.upsert_site("mybench", bench.path(), &site).await.unwrap();

    let spec = shell_spec(ActionKind::DropSite, bench.path(), "old.localhost", "true");
    harness.task().run(spec).await;

    assert_eq!(harness.only_record().status, LogStatus::Success);
    assert!(harness.store.sites().is_empty());
}

#[tokio::test]
async fn secret_reaches_stdin_and_the_stream_is_closed() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    // cat only terminates if stdin is closed after the secret is written.
    let mut spec = shell_spec(ActionKind::BackupSite, bench.path(), "foo.localhost", "cat");
    spec.secret = Some("hunter2".to_string());

    harness.task().run(spec).await;

    let record = harness.only_record();
    assert_eq!(record.status, LogStatus::Success);
    assert!(record.log.contains("hunter2"));
}

#[tokio::test]
async fn accepted_backup_runs_through_the_queue() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let bench_path = bench.path().to_string_lossy().into_owned();
    let actions = harness.actions(settings_with_credentials(bench.path()));

    let response = actions.backup_site("mybench", &bench_path, "foo.localhost").unwrap();
    assert!(response.success);
    assert_eq!(harness.queue.pending(), 1);

    // Nothing is spawned and no record exists until the queue runs the job.
    assert!(harness.sink.records().is_empty());
}

#[tokio::test]
async fn queued_task_runs_only_when_the_queue_is_driven() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let spec = shell_spec(
        ActionKind::BackupSite,
        bench.path(),
        "foo.localhost",
        "printf 'ok\\n'",
    );
    let task = harness.task();
    harness.queue.enqueue(async move { task.run(spec).await }).unwrap();

    assert_eq!(harness.queue.pending(), 1);
    assert!(harness.sink.records().is_empty());

    harness.queue.run_all().await;

    assert_eq!(harness.queue.pending(), 0);
    let record = harness.only_record();
    assert_eq!(record.status, LogStatus::Success);
    assert!(record.log.contains("ok"));
}

#[tokio::test]
async fn missing_credentials_reject_before_enqueueing() {
    let harness = Harness::new();
    let bench = tempfile::tempdir().unwrap();
    let bench_path = bench.path().to_string_lossy().into_owned();
    let settings = Settings {
        bench_root: bench.path().to_path_buf(),
        sudo_password: None,
        db_root_password: None,
    };
    let actions = harness.actions(settings);

    assert!(actions.backup_site("mybench", &bench_path, "foo.localhost").is_err());
    assert!(actions.create_site("mybench", &bench_path, "foo.localhost").is_err());
    assert_eq!(harness.queue.pending(), 0);
    assert!(harness.sink.records().is_empty());
}

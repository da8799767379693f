// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service specs: stopping a bench by freeing its configured ports.

use crate::prelude::*;

fn bench_with_ports(root: &Path) -> PathBuf {
    let bench = make_bench(root, "prod-bench");
    std::fs::create_dir_all(bench.join("config")).unwrap();
    std::fs::write(
        bench.join("config/redis_cache.conf"),
        "daemonize no\nport 33711\nmaxmemory 256mb\n",
    )
    .unwrap();
    std::fs::write(bench.join("config/redis_queue.conf"), "port 33712\n").unwrap();
    std::fs::create_dir_all(bench.join("sites/shop.localhost")).unwrap();
    std::fs::write(
        bench.join("sites/shop.localhost/site_config.json"),
        r#"{"db_name": "shop", "webserver_port": 33800, "socketio_port": 33900}"#,
    )
    .unwrap();
    bench
}

#[tokio::test]
async fn stop_bench_reports_every_configured_port() {
    let harness = Harness::new();
    let root = tempfile::tempdir().unwrap();
    let bench = bench_with_ports(root.path());
    let actions = harness.actions(settings_with_credentials(root.path()));

    let response = actions
        .stop_bench("prod-bench", &bench.to_string_lossy())
        .await
        .unwrap();

    assert!(response.success);
    let data = response.data.unwrap();
    assert_eq!(
        data["stopped_ports"],
        serde_json::json!([33711, 33712, 33800, 33900])
    );
}

#[tokio::test]
async fn stop_bench_rejects_a_path_without_config_or_sites() {
    let harness = Harness::new();
    let root = tempfile::tempdir().unwrap();
    let bare = root.path().join("not-a-bench");
    std::fs::create_dir(&bare).unwrap();
    let actions = harness.actions(settings_with_credentials(root.path()));

    let result = actions.stop_bench("not-a-bench", &bare.to_string_lossy()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn stop_bench_with_no_configured_ports_is_a_validation_error() {
    let harness = Harness::new();
    let root = tempfile::tempdir().unwrap();
    let bench = make_bench(root.path(), "prod-bench");
    std::fs::create_dir_all(bench.join("config")).unwrap();
    let actions = harness.actions(settings_with_credentials(root.path()));

    let result = actions.stop_bench("prod-bench", &bench.to_string_lossy()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn start_bench_rejects_a_missing_path() {
    let harness = Harness::new();
    let root = tempfile::tempdir().unwrap();
    let actions = harness.actions(settings_with_credentials(root.path()));

    let result = actions.start_bench("ghost", "/definitely/not/here").await;
    assert!(result.is_err());

    let result = actions.start_bench("ghost", "").await;
    assert!(result.is_err());
}

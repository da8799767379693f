// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inventory specs: scanning a bench tree and syncing it into the store.

use crate::prelude::*;
use bo_engine::sync_benches;

const VERSION_JSON: &str = r#"[
    {"app": "frappe", "branch": "version-15", "version": "15.2.0", "commit": "abc123"},
    {"app": "erpnext", "branch": "version-15", "version": "15.1.0", "commit": "def456"}
]"#;

/// Full fixture: app checkouts with hooks titles and git remotes.
fn populate_apps(bench: &Path) {
    for (app, title, remote) in [
        ("frappe", "Frappe Framework", "https://example.com/frappe.git"),
        ("erpnext", "ERPNext", "https://example.com/erpnext.git"),
    ] {
        let app_dir = bench.join("apps").join(app);
        std::fs::create_dir_all(app_dir.join(app)).unwrap();
        std::fs::write(
            app_dir.join(app).join("hooks.py"),
            format!("app_title = \"{title}\"\n"),
        )
        .unwrap();
        std::fs::create_dir_all(app_dir.join(".git")).unwrap();
        std::fs::write(
            app_dir.join(".git/config"),
            format!("[remote \"origin\"]\n\turl = {remote}\n"),
        )
        .unwrap();
    }
}

#[tokio::test]
async fn scan_resolves_titles_remotes_and_site_intersections() {
    let root = tempfile::tempdir().unwrap();
    let bench = make_bench(root.path(), "prod-bench");
    std::fs::create_dir_all(bench.join("sites/shop.localhost")).unwrap();
    std::fs::create_dir_all(bench.join("sites/assets")).unwrap();
    populate_apps(&bench);

    let runner = FakeRunner::new()
        .on("bench version", VERSION_JSON)
        .on("list-apps", r#"["frappe", "erpnext"]"#);
    let benches = BenchScanner::new(runner).scan(root.path()).await;

    assert_eq!(benches.len(), 1);
    let entry = &benches[0];
    assert_eq!(entry.name, "prod-bench");
    assert_eq!(entry.version.as_deref(), Some("15.2.0"));

    let erpnext = entry.app("erpnext").unwrap();
    assert_eq!(erpnext.title, "ERPNext");
    assert_eq!(erpnext.repo_url.as_deref(), Some("https://example.com/erpnext.git"));

    assert_eq!(entry.sites.len(), 1);
    assert_eq!(entry.sites[0].apps.len(), 2);
}

#[tokio::test]
async fn sync_pushes_the_scanned_tree_into_the_store() {
    let harness = Harness::new();
    let root = tempfile::tempdir().unwrap();
    let bench = make_bench(root.path(), "prod-bench");
    std::fs::create_dir_all(bench.join("sites/shop.localhost")).unwrap();
    populate_apps(&bench);

    let runner = FakeRunner::new()
        .on("bench version", VERSION_JSON)
        .on("list-apps", r#"["frappe"]"#);
    let scanner = BenchScanner::new(runner);
    let settings = settings_with_credentials(root.path());

    let response = sync_benches(&settings, &scanner, &harness.store).await;

    assert!(response.success);
    let data = response.data.unwrap();
    assert_eq!(data["updated_benches"], serde_json::json!(["prod-bench"]));

    assert_eq!(harness.store.benches().len(), 1);
    assert_eq!(harness.store.apps().len(), 2);
    let sites = harness.store.sites();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].site.apps.len(), 1);
    assert_eq!(sites[0].site.apps[0].name, "frappe");
}

#[tokio::test]
async fn broken_bench_is_synced_with_its_error_but_isolated() {
    let harness = Harness::new();
    let root = tempfile::tempdir().unwrap();
    make_bench(root.path(), "bench_bad");
    let ok = make_bench(root.path(), "bench_ok");
    std::fs::create_dir_all(ok.join("sites/shop.localhost")).unwrap();

    let runner = FakeRunner::new()
        .on_fail("bench_bad", "Traceback: boom")
        .on("bench version", VERSION_JSON)
        .on("list-apps", r#"["erpnext"]"#);
    let scanner = BenchScanner::new(runner);
    let settings = settings_with_credentials(root.path());

    let response = sync_benches(&settings, &scanner, &harness.store).await;
    assert!(response.success);

    let benches = harness.store.benches();
    assert_eq!(benches.len(), 2);
    let bad = benches.iter().find(|b| b.name == "bench_bad").unwrap();
    assert!(bad.is_error);
    assert!(bad.error_message.as_deref().unwrap_or_default().contains("boom"));

    let good = benches.iter().find(|b| b.name == "bench_ok").unwrap();
    assert!(!good.is_error);
    assert_eq!(good.sites.len(), 1);
}

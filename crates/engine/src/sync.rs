// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inventory sync: scan the bench root and push the result into the
//! record store.
//!
//! Every discovered bench is upserted, including errored ones, so the
//! store reflects reality. Apps and sites are only written for healthy
//! benches; an errored bench keeps whatever inventory it had.

use crate::scan::BenchScanner;
use bo_adapters::{CommandRunner, RecordStore, StoreError};
use bo_core::{ActionResponse, Settings};
use std::collections::BTreeSet;

/// Scan `settings.bench_root` and upsert the inventory into `store`.
///
/// Returns the deduplicated names of benches and apps that were written.
/// A store failure aborts the sync; records written before the failure
/// stay written.
pub async fn sync_benches<R, S>(
    settings: &Settings,
    scanner: &BenchScanner<R>,
    store: &S,
) -> ActionResponse
where
    R: CommandRunner,
    S: RecordStore,
{
    let benches = scanner.scan(&settings.bench_root).await;
    match upsert_inventory(store, &benches).await {
        Ok((updated_benches, updated_apps)) => {
            tracing::info!(
                benches = updated_benches.len(),
                apps = updated_apps.len(),
                "bench sync complete"
            );
            ActionResponse::ok_with(
                "Benches synced successfully.",
                serde_json::json!({
                    "updated_benches": updated_benches,
                    "updated_apps": updated_apps,
                }),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "bench sync failed");
            ActionResponse::fail(format!("Bench sync failed: {e}"))
        }
    }
}

async fn upsert_inventory<S: RecordStore>(
    store: &S,
    benches: &[bo_core::BenchEntry],
) -> Result<(Vec<String>, Vec<String>), StoreError> {
    let mut updated_benches = BTreeSet::new();
    let mut updated_apps = BTreeSet::new();

    for bench in benches {
        store.upsert_bench(bench).await?;
        updated_benches.insert(bench.name.clone());
        if bench.is_error {
            continue;
        }

        for app in &bench.apps {
            store.upsert_app(app).await?;
            updated_apps.insert(app.name.clone());
        }
        for site in &bench.sites {
            store.upsert_site(&bench.name, &bench.path, site).await?;
        }
    }

    Ok((
        updated_benches.into_iter().collect(),
        updated_apps.into_iter().collect(),
    ))
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;

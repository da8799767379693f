// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervision of one long-running bench command.
//!
//! A task owns exactly one OS process. Its stdout/stderr are redirected
//! into a private scratch log file which is tailed into the task's log
//! record and always removed on exit, whatever path led there.

use crate::stream::LogStreamer;
use bo_core::{
    ActionKind, Clock, LogId, LogRecord, LogStatus, SiteEntry, TaskError,
};
use bo_adapters::{LogSink, Notifier, RecordStore};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Bounded wait for site backups.
pub const BACKUP_TIMEOUT: Duration = Duration::from_secs(900);
/// Bounded wait for site drops.
pub const DROP_TIMEOUT: Duration = Duration::from_secs(600);
/// Bounded wait for site restores.
pub const RESTORE_TIMEOUT: Duration = Duration::from_secs(1200);

/// Parameters for one supervised command. Ephemeral; never persisted.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// In practice always one of the four site lifecycle kinds; service
    /// start/stop act synchronously and never build a spec. The match
    /// arms below cover them for exhaustiveness only.
    pub action: ActionKind,
    pub bench_name: String,
    pub bench_path: PathBuf,
    pub site_name: String,
    /// Command argv, spawned directly (not through a shell).
    pub argv: Vec<String>,
    /// Secret written to the process's stdin, then flushed and closed
    /// immediately so an interactive prompt can never hang the task.
    pub secret: Option<String>,
    /// Bounded wait. `None` means no upfront wait; the log is tailed live
    /// until exit is observed.
    pub timeout: Option<Duration>,
    /// Title for the log record.
    pub title: String,
}

impl TaskSpec {
    /// Scratch log file inside the bench directory.
    fn log_file(&self) -> PathBuf {
        let slug = match self.action {
            ActionKind::CreateSite => "new_site",
            ActionKind::BackupSite => "backup_site",
            ActionKind::RestoreSite => "restore_site",
            ActionKind::DropSite => "drop_site",
            ActionKind::StartBench => "start",
            ActionKind::StopBench => "stop",
        };
        self.bench_path.join(format!("bench_{}_{}.log", slug, self.site_name))
    }

    fn timeout_phrase(&self) -> &'static str {
        match self.action {
            ActionKind::CreateSite => "creating site",
            ActionKind::BackupSite => "taking backup",
            ActionKind::RestoreSite => "restoring site",
            ActionKind::DropSite => "deleting site",
            ActionKind::StartBench => "starting bench",
            ActionKind::StopBench => "stopping bench",
        }
    }

    fn success_message(&self) -> String {
        match self.action {
            ActionKind::CreateSite => format!(
                "Site {} created successfully in bench {}",
                self.site_name, self.bench_name
            ),
            ActionKind::BackupSite => format!(
                "Backup for site {} completed successfully in bench {}",
                self.site_name, self.bench_name
            ),
            ActionKind::RestoreSite => format!(
                "Site {} restored successfully in bench {}",
                self.site_name, self.bench_name
            ),
            ActionKind::DropSite => format!(
                "Site {} deleted successfully from bench {}",
                self.site_name, self.bench_name
            ),
            _ => format!("{} completed for bench {}", self.action, self.bench_name),
        }
    }

    fn error_message(&self) -> String {
        format!(
            "Error while {} {} in bench {}",
            self.timeout_phrase(),
            self.site_name,
            self.bench_name
        )
    }
}

/// How the underlying process finished.
enum Outcome {
    Completed(ExitStatus),
    TimedOut(Duration),
}

/// Supervisor for one background bench operation.
#[derive(Clone)]
pub struct ManagedTask<S, R, N, C>
where
    S: LogSink,
    R: RecordStore,
    N: Notifier,
    C: Clock,
{
    sink: S,
    store: R,
    notifier: N,
    clock: C,
}

impl<S, R, N, C> ManagedTask<S, R, N, C>
where
    S: LogSink,
    R: RecordStore,
    N: Notifier,
    C: Clock,
{
    pub fn new(sink: S, store: R, notifier: N, clock: C) -> Self {
        Self { sink, store, notifier, clock }
    }

    /// Run the task to completion. Never returns an error: every failure
    /// is converted into a terminal `Error` status on the log record.
    pub async fn run(&self, spec: TaskSpec) {
        let record = LogRecord::new(spec.action, &spec.title, &self.clock);
        let id = record.id.clone();
        if let Err(e) = self.sink.create(record).await {
            tracing::error!(action = %spec.action, error = %e, "failed to create log record");
            return;
        }

        let log_file = spec.log_file();
        let outcome = self.supervise(&spec, &id, &log_file).await;
        self.finalize(&spec, &id, outcome).await;

        // Exactly-once scratch file cleanup, on every exit path.
        if log_file.exists() {
            if let Err(e) = std::fs::remove_file(&log_file) {
                tracing::warn!(file = %log_file.display(), error = %e, "failed to remove temp log file");
            }
        }
    }

    /// Spawn, feed the secret, wait (bounded or live-tailed), and stream
    /// the log into the record.
    async fn supervise(
        &self,
        spec: &TaskSpec,
        id: &LogId,
        log_file: &Path,
    ) -> Result<Outcome, TaskError> {
        let out = std::fs::File::create(log_file)?;
        let err = out.try_clone()?;

        let (program, args) = spec
            .argv
            .split_first()
            .ok_or_else(|| TaskError::validation("empty command"))?;
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .current_dir(&spec.bench_path)
            .stdout(Stdio::from(out))
            .stderr(Stdio::from(err))
            .stdin(if spec.secret.is_some() { Stdio::piped() } else { Stdio::null() });

        let mut child = cmd.spawn()?;

        if let Some(secret) = &spec.secret {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(secret.as_bytes()).await?;
                stdin.write_all(b"\n").await?;
                stdin.flush().await?;
                // Dropping the handle closes the stream; the process never
                // sees an open stdin to block on.
            }
        }

        let streamer = LogStreamer::new(&self.sink, id);
        match spec.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => {
                    let status = status?;
                    // Post-hoc: the process is done, forward the whole file.
                    if let Err(e) = streamer.stream_post_hoc(log_file).await {
                        tracing::warn!(id = %id, error = %e, "failed to stream log file");
                    }
                    Ok(Outcome::Completed(status))
                }
                Err(_) => {
                    child.kill().await?;
                    Ok(Outcome::TimedOut(limit))
                }
            },
            None => {
                let status = streamer.stream_live(log_file, &mut child).await?;
                Ok(Outcome::Completed(status))
            }
        }
    }

    async fn finalize(&self, spec: &TaskSpec, id: &LogId, outcome: Result<Outcome, TaskError>) {
        match outcome {
            Ok(Outcome::Completed(status)) if status.code() == Some(0) => {
                self.set_status(id, LogStatus::Success).await;
                self.follow_up(spec).await;
                self.notify(&format!("{} Success", spec.action), &spec.success_message())
                    .await;
            }
            Ok(Outcome::Completed(status)) => {
                // Non-zero and signal-terminated exits are both failures.
                tracing::warn!(id = %id, ?status, "task process failed");
                self.set_status(id, LogStatus::Error).await;
                self.notify(&format!("{} Error", spec.action), &spec.error_message()).await;
            }
            Ok(Outcome::TimedOut(limit)) => {
                tracing::warn!(id = %id, ?limit, "task timed out, process killed");
                self.append(id, &format!("\nTimed out while {}!\n", spec.timeout_phrase()))
                    .await;
                self.set_status(id, LogStatus::Error).await;
                self.notify(
                    &format!("{} Timeout", spec.action),
                    &format!(
                        "Timeout expired while {} {}.",
                        spec.timeout_phrase(),
                        spec.site_name
                    ),
                )
                .await;
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "task failed");
                self.append(id, &format!("\n{e}\n")).await;
                self.set_status(id, LogStatus::Error).await;
                self.notify(&format!("{} Error", spec.action), &spec.error_message()).await;
            }
        }
    }

    /// Reflect a successful create/drop into the site inventory.
    async fn follow_up(&self, spec: &TaskSpec) {
        let result = match spec.action {
            ActionKind::CreateSite => {
                // Attach the framework app's metadata from the bench record,
                // when the bench has been synced.
                let apps = match self.store.find_bench(&spec.bench_name).await {
                    Ok(Some(bench)) => bench.app("frappe").cloned().into_iter().collect(),
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        tracing::warn!(bench = %spec.bench_name, error = %e, "bench lookup failed");
                        Vec::new()
                    }
                };
                let site = SiteEntry {
                    name: spec.site_name.clone(),
                    path: spec.bench_path.join("sites").join(&spec.site_name),
                    apps,
                };
                self.store.upsert_site(&spec.bench_name, &spec.bench_path, &site).await
            }
            ActionKind::DropSite => {
                self.store.remove_site(&spec.bench_name, &spec.site_name).await
            }
            _ => return,
        };
        if let Err(e) = result {
            tracing::warn!(
                bench = %spec.bench_name,
                site = %spec.site_name,
                error = %e,
                "failed to update site record"
            );
        }
    }

    async fn append(&self, id: &LogId, text: &str) {
        if let Err(e) = self.sink.append_log(id, text).await {
            tracing::warn!(id = %id, error = %e, "failed to append to log record");
        }
    }

    async fn set_status(&self, id: &LogId, status: LogStatus) {
        if let Err(e) = self.sink.set_status(id, status).await {
            tracing::warn!(id = %id, error = %e, "failed to set log status");
        }
    }

    async fn notify(&self, title: &str, message: &str) {
        if let Err(e) = self.notifier.notify(title, message).await {
            tracing::debug!(error = %e, "notification failed");
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public entry points, one per bench operation.
//!
//! Each validates its inputs and required credentials before any process
//! is spawned or job enqueued, then either hands a [`TaskSpec`] to the job
//! queue (site lifecycle operations) or acts synchronously (service
//! start/stop).

use crate::reclaim::PortReclaimer;
use crate::task::{ManagedTask, TaskSpec, BACKUP_TIMEOUT, DROP_TIMEOUT, RESTORE_TIMEOUT};
use bo_adapters::ports::PortKiller;
use bo_adapters::{JobQueue, LogSink, Notifier, RecordStore};
use bo_core::{ActionKind, ActionResponse, Clock, Settings, TaskError};
use std::path::{Path, PathBuf};

/// Bundle of the engine's collaborators plus operator settings.
#[derive(Clone)]
pub struct Actions<S, R, N, Q, C>
where
    S: LogSink,
    R: RecordStore,
    N: Notifier,
    Q: JobQueue,
    C: Clock,
{
    sink: S,
    store: R,
    notifier: N,
    queue: Q,
    clock: C,
    settings: Settings,
}

impl<S, R, N, Q, C> Actions<S, R, N, Q, C>
where
    S: LogSink,
    R: RecordStore,
    N: Notifier,
    Q: JobQueue,
    C: Clock + 'static,
{
    pub fn new(sink: S, store: R, notifier: N, queue: Q, clock: C, settings: Settings) -> Self {
        Self { sink, store, notifier, queue, clock, settings }
    }

    /// Create a new site in the bench. Runs in the background with live
    /// log tailing (no upfront wait).
    pub fn create_site(
        &self,
        bench_name: &str,
        bench_path: &str,
        site_name: &str,
    ) -> Result<ActionResponse, TaskError> {
        require(bench_path, site_name)?;
        let sudo = self.settings.require_sudo_password()?.to_string();
        let db_root = self.settings.require_db_root_password()?.to_string();

        let argv = vec![
            "sudo".into(),
            "-S".into(),
            "bench".into(),
            "new-site".into(),
            site_name.into(),
            "--db-root-password".into(),
            db_root,
            "--admin-password".into(),
            "root".into(),
            "--verbose".into(),
        ];
        let spec = self.spec(ActionKind::CreateSite, bench_name, bench_path, site_name, argv);
        let spec = TaskSpec { secret: Some(sudo), timeout: None, ..spec };
        self.enqueue(spec)?;

        Ok(ActionResponse::ok(format!(
            "Creating {site_name} in the background. Check the operation log for details."
        )))
    }

    /// Back up a site, with files. 15 minute bound.
    pub fn backup_site(
        &self,
        bench_name: &str,
        bench_path: &str,
        site_name: &str,
    ) -> Result<ActionResponse, TaskError> {
        require(bench_path, site_name)?;
        let sudo = self.settings.require_sudo_password()?.to_string();

        let argv = vec![
            "sudo".into(),
            "-S".into(),
            "bench".into(),
            "--site".into(),
            site_name.into(),
            "backup".into(),
            "--with-files".into(),
        ];
        let spec = self.spec(ActionKind::BackupSite, bench_name, bench_path, site_name, argv);
        let spec = TaskSpec { secret: Some(sudo), timeout: Some(BACKUP_TIMEOUT), ..spec };
        self.enqueue(spec)?;

        Ok(ActionResponse::ok(format!(
            "Backing up site {site_name} in the background. Check the operation log for details."
        )))
    }

    /// Restore a site from backup files. 20 minute bound.
    ///
    /// `db_file` is required; the file archives are optional and skipped
    /// when absent.
    pub fn restore_site(
        &self,
        bench_name: &str,
        bench_path: &str,
        site_name: &str,
        db_file: &str,
        public_files: Option<&str>,
        private_files: Option<&str>,
    ) -> Result<ActionResponse, TaskError> {
        require(bench_path, site_name)?;
        if db_file.is_empty() {
            return Err(TaskError::validation("db_file is required"));
        }
        let sudo = self.settings.require_sudo_password()?.to_string();
        let db_root = self.settings.require_db_root_password()?.to_string();

        let mut argv: Vec<String> = vec![
            "sudo".into(),
            "-S".into(),
            "bench".into(),
            "--site".into(),
            site_name.into(),
            "--force".into(),
            "restore".into(),
            db_file.into(),
        ];
        if let Some(public) = public_files {
            argv.push("--with-public-files".into());
            argv.push(public.into());
        }
        if let Some(private) = private_files {
            argv.push("--with-private-files".into());
            argv.push(private.into());
        }
        argv.push("--mariadb-root-password".into());
        argv.push(db_root);

        let spec = self.spec(ActionKind::RestoreSite, bench_name, bench_path, site_name, argv);
        let spec = TaskSpec { secret: Some(sudo), timeout: Some(RESTORE_TIMEOUT), ..spec };
        self.enqueue(spec)?;

        Ok(ActionResponse::ok(format!(
            "Restoring site {site_name} in the background. Check the operation log for details."
        )))
    }

    /// Drop a site without backup. 10 minute bound.
    pub fn drop_site(
        &self,
        bench_name: &str,
        bench_path: &str,
        site_name: &str,
    ) -> Result<ActionResponse, TaskError> {
        require(bench_path, site_name)?;
        let sudo = self.settings.require_sudo_password()?.to_string();
        let db_root = self.settings.require_db_root_password()?.to_string();

        let argv = vec![
            "sudo".into(),
            "-S".into(),
            "bench".into(),
            "drop-site".into(),
            site_name.into(),
            "--db-root-password".into(),
            db_root,
            "--no-backup".into(),
            "--force".into(),
        ];
        let spec = self.spec(ActionKind::DropSite, bench_name, bench_path, site_name, argv);
        let spec = TaskSpec { secret: Some(sudo), timeout: Some(DROP_TIMEOUT), ..spec };
        self.enqueue(spec)?;

        Ok(ActionResponse::ok(format!(
            "Deleting site {site_name} in the background. Check the operation log for details."
        )))
    }

    /// Start all bench services, detached from the calling process.
    pub async fn start_bench(
        &self,
        bench_name: &str,
        bench_path: &str,
    ) -> Result<ActionResponse, TaskError> {
        if bench_path.is_empty() {
            return Err(TaskError::validation("bench_path is required"));
        }
        let path = absolute(bench_path);
        if !path.is_dir() {
            return Err(TaskError::validation(format!(
                "Invalid bench path: {}",
                path.display()
            )));
        }

        start_services(&path).await?;

        Ok(ActionResponse::ok_with(
            format!("Bench '{bench_name}' services start command issued successfully."),
            serde_json::json!({ "bench_path": path }),
        ))
    }

    /// Stop bench services by freeing every port they are configured on.
    pub async fn stop_bench(
        &self,
        bench_name: &str,
        bench_path: &str,
    ) -> Result<ActionResponse, TaskError> {
        if bench_path.is_empty() {
            return Err(TaskError::validation("bench_path is required"));
        }
        let path = absolute(bench_path);
        if !path.join("config").is_dir() || !path.join("sites").is_dir() {
            return Err(TaskError::validation(format!(
                "Invalid bench path or missing 'config' or 'sites' folder: {}",
                path.display()
            )));
        }

        let reclaimer = PortReclaimer::new(PortKiller::for_platform());
        let ports = reclaimer.reclaim(&path).await;
        if ports.is_empty() {
            return Err(TaskError::validation("No bench service ports found to stop."));
        }

        Ok(ActionResponse::ok_with(
            format!("{bench_name} bench services are stopped successfully."),
            serde_json::json!({ "stopped_ports": ports }),
        ))
    }

    fn spec(
        &self,
        action: ActionKind,
        bench_name: &str,
        bench_path: &str,
        site_name: &str,
        argv: Vec<String>,
    ) -> TaskSpec {
        TaskSpec {
            action,
            bench_name: bench_name.to_string(),
            bench_path: absolute(bench_path),
            site_name: site_name.to_string(),
            argv,
            secret: None,
            timeout: None,
            title: format!("{action} - {site_name}"),
        }
    }

    fn enqueue(&self, spec: TaskSpec) -> Result<(), TaskError> {
        let task = ManagedTask::new(
            self.sink.clone(),
            self.store.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        );
        self.queue
            .enqueue(async move { task.run(spec).await })
            .map_err(|e| TaskError::Process(e.to_string()))
    }
}

fn require(bench_path: &str, site_name: &str) -> Result<(), TaskError> {
    if bench_path.is_empty() || site_name.is_empty() {
        return Err(TaskError::validation("bench_path and site_name are required"));
    }
    Ok(())
}

fn absolute(path: &str) -> PathBuf {
    let path = Path::new(path);
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Issue the detached `bench start`. On Linux the process is backgrounded
/// with nohup in its own process group so it survives the caller's exit.
async fn start_services(bench_path: &Path) -> Result<(), TaskError> {
    #[cfg(target_os = "linux")]
    {
        let log_file = bench_path.join("bench_start.log");
        let cmd = format!(
            "nohup {}/env/bin/bench start > {} 2>&1 &",
            bench_path.display(),
            log_file.display()
        );
        let mut command = tokio::process::Command::new("sh");
        command
            .arg("-c")
            .arg(cmd)
            .current_dir(bench_path)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .process_group(0);
        // The wrapping shell exits as soon as nohup detaches.
        command.status().await.map_err(TaskError::Io)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let mut command = tokio::process::Command::new("sh");
        command
            .arg("-c")
            .arg("bench start")
            .current_dir(bench_path)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        command.spawn().map_err(TaskError::Io)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;

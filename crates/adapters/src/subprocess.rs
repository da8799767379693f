// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous-style shell execution for short metadata probes.

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Errors from shell command execution.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Command exited non-zero; the message is the captured output, not a
    /// generic failure code.
    #[error("{output}")]
    Failed { output: String },

    /// Command could not be launched at all.
    #[error("failed to launch: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Run a command through the shell, capturing combined stdout+stderr.
///
/// Returns trimmed output on success. On non-zero exit the captured output
/// becomes the error message; the failure is also traced. Nothing ever
/// panics or propagates past this boundary as anything but [`ProcessError`].
pub async fn run_cmd(cmd: &str, cwd: Option<&Path>) -> Result<String, ProcessError> {
    let mut command = Command::new("sh");
    command.arg("-c").arg(format!("{cmd} 2>&1"));
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().await.map_err(|e| {
        tracing::warn!(cmd, error = %e, "command could not be launched");
        ProcessError::Spawn(e)
    })?;

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if output.status.success() {
        Ok(text)
    } else {
        tracing::warn!(cmd, output = %text, "command failed");
        Err(ProcessError::Failed { output: text })
    }
}

/// Seam over shell execution so probes can be faked in tests.
#[async_trait::async_trait]
pub trait CommandRunner: Clone + Send + Sync + 'static {
    async fn run(&self, cmd: &str, cwd: Option<&Path>) -> Result<String, ProcessError>;
}

/// Runner that executes commands through the real shell.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

#[async_trait::async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, cmd: &str, cwd: Option<&Path>) -> Result<String, ProcessError> {
        run_cmd(cmd, cwd).await
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    enum Canned {
        Ok(String),
        Fail(String),
    }

    /// Runner with canned responses keyed by substring.
    ///
    /// Each pattern is matched against `"{cmd} @ {cwd}"`, so rules can
    /// key on the command, the directory it runs in, or both. The first
    /// matching rule wins. Commands with no matching rule fail, so tests
    /// notice unexpected probes.
    #[derive(Clone, Default)]
    pub struct FakeRunner {
        rules: Arc<Mutex<Vec<(String, Canned)>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Commands containing `pattern` succeed with `output`.
        pub fn on(self, pattern: &str, output: &str) -> Self {
            self.rules
                .lock()
                .push((pattern.to_string(), Canned::Ok(output.to_string())));
            self
        }

        /// Commands containing `pattern` fail with `output` as captured output.
        pub fn on_fail(self, pattern: &str, output: &str) -> Self {
            self.rules
                .lock()
                .push((pattern.to_string(), Canned::Fail(output.to_string())));
            self
        }

        /// Every command executed so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait::async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, cmd: &str, cwd: Option<&Path>) -> Result<String, ProcessError> {
            let target = match cwd {
                Some(dir) => format!("{cmd} @ {}", dir.display()),
                None => cmd.to_string(),
            };
            self.calls.lock().push(target.clone());
            let rules = self.rules.lock();
            for (pattern, canned) in rules.iter() {
                if target.contains(pattern.as_str()) {
                    return match canned {
                        Canned::Ok(out) => Ok(out.clone()),
                        Canned::Fail(out) => Err(ProcessError::Failed { output: out.clone() }),
                    };
                }
            }
            Err(ProcessError::Failed { output: format!("no canned response for: {cmd}") })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRunner;

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;

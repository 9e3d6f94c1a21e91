//! Process executor
//!
//! Runs one shell command in its own process group, buffers its stdout and
//! stderr, and races completion against a [`CancellationToken`].
//!
//! ```text
//! spawn ─▶ ProcessHandle ─┬─ wait task: child.wait() + drain pipes ─▶ done
//!                         └─ caller:  select!(cancelled, done)
//!                                       cancelled ─▶ SIGTERM group ─▶ join done
//! ```
//!
//! Platform specifics (group creation, signalling, status decoding) live in
//! the `platform` module.

#[cfg(unix)]
#[path = "unix.rs"]
mod platform;

#[cfg(not(unix))]
#[path = "fallback.rs"]
mod platform;

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use toolchat_domain::ExitOutcome;
use tracing::{debug, warn};

/// Default shell used for `<shell> -c <command>`.
pub const DEFAULT_SHELL: &str = "bash";

/// Errors that prevent a command from producing a report.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to start command: {0}")]
    Spawn(#[source] io::Error),

    #[error("operation cancelled")]
    Cancelled,
}

/// What a finished command left behind.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub outcome: ExitOutcome,
    /// Process group ID, `None` when it could not be determined
    pub process_group: Option<i32>,
}

/// Terminal state delivered by the wait task.
struct Completion {
    status: io::Result<ExitStatus>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// A running command.
///
/// Owned by the [`ProcessExecutor::run`] call that spawned it and consumed
/// when that call returns.
struct ProcessHandle {
    pid: Option<u32>,
    pgid: Option<i32>,
    kill: Option<oneshot::Sender<()>>,
    done: oneshot::Receiver<Completion>,
}

impl ProcessHandle {
    fn spawn(shell: &str, command: &str, working_dir: &Path) -> io::Result<Self> {
        let mut cmd = tokio::process::Command::new(shell);
        cmd.arg("-c")
            .arg(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        platform::new_process_group(&mut cmd);

        let mut child = cmd.spawn()?;
        let pid = child.id();
        let pgid = pid.and_then(platform::process_group_of);
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(async move {
            let stdout_task = tokio::spawn(drain(stdout));
            let stderr_task = tokio::spawn(drain(stderr));

            let status = tokio::select! {
                status = child.wait() => status,
                Ok(()) = kill_rx => {
                    if let Err(e) = child.start_kill() {
                        debug!("start_kill failed: {}", e);
                    }
                    child.wait().await
                }
            };

            // Pipes close once every process holding them has exited,
            // including background jobs left in the group.
            let stdout = stdout_task.await.unwrap_or_default();
            let stderr = stderr_task.await.unwrap_or_default();

            let _ = done_tx.send(Completion {
                status,
                stdout,
                stderr,
            });
        });

        Ok(Self {
            pid,
            pgid,
            kill: Some(kill_tx),
            done: done_rx,
        })
    }

    /// Signal the whole group, or the direct child when no group is known.
    fn terminate(&mut self) {
        if let Some(pgid) = self.pgid {
            match platform::terminate_group(pgid) {
                Ok(()) => {
                    debug!(pgid, "Sent SIGTERM to process group");
                    return;
                }
                Err(e) => warn!(pgid, "Failed to signal process group: {}", e),
            }
        }
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
    }

    /// Wait for completion unless `cancel` fires first. On cancellation the
    /// group is signalled and the wait is still joined before returning.
    async fn wait_or_cancel(mut self, cancel: &CancellationToken) -> Result<Completion, ProcessError> {
        let finished = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            completion = &mut self.done => Some(completion),
        };

        match finished {
            Some(completion) => Ok(completion.unwrap_or_else(|_| lost_wait())),
            None => {
                self.terminate();
                let _ = (&mut self.done).await;
                Err(ProcessError::Cancelled)
            }
        }
    }
}

fn lost_wait() -> Completion {
    Completion {
        status: Err(io::Error::other("process wait task ended unexpectedly")),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe
        && let Err(e) = pipe.read_to_end(&mut buf).await
    {
        // Keep whatever arrived before the error.
        debug!("Output pipe read failed: {}", e);
    }
    buf
}

/// Spawns commands through a shell in a fresh process group.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    shell: String,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ProcessExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Run `command` in `working_dir` and decode how it ended.
    ///
    /// A non-zero exit or a signal is a normal [`ProcessOutput`]; only a
    /// failure to start and cancellation are errors.
    pub async fn run(
        &self,
        command: &str,
        working_dir: impl Into<PathBuf>,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        let working_dir = working_dir.into();
        let handle =
            ProcessHandle::spawn(&self.shell, command, &working_dir).map_err(ProcessError::Spawn)?;
        let pid = handle.pid;
        let spawn_pgid = handle.pgid;
        debug!(?pid, ?spawn_pgid, dir = %working_dir.display(), "Spawned command");

        let completion = handle.wait_or_cancel(cancel).await?;

        let outcome = match completion.status {
            Ok(status) => platform::decode_status(status),
            Err(e) => ExitOutcome::failed(e.to_string()),
        };
        // The leader is usually reaped by now; the spawn-time value stands in.
        let process_group = pid.and_then(platform::process_group_of).or(spawn_pgid);

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&completion.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&completion.stderr).into_owned(),
            outcome,
            process_group,
        })
    }
}

// src/exec/action_runner.rs

//! Production process runner backed by `tokio::process`.

use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::errors::{PomoError, Result};
use crate::exec::backend::{ActionCommand, ActionHandle, Completion, ProcessRunner};
use crate::types::Generation;

/// Runner that spawns each action as a child process and supervises it in a
/// background Tokio task.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct RealProcessRunner {
    completion_tx: mpsc::Sender<Completion>,
}

impl RealProcessRunner {
    /// Create a runner that reports tracked completions on `completion_tx`.
    pub fn new(completion_tx: mpsc::Sender<Completion>) -> Self {
        Self { completion_tx }
    }

    fn launch(
        &self,
        command: ActionCommand,
        generation: Option<Generation>,
    ) -> Result<ActionHandle> {
        let child = spawn_child(&command)?;
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        info!(
            action = %command.kind,
            ?generation,
            pid = ?child.id(),
            "launched {}",
            command
        );

        let kind = command.kind;
        let notify = generation.map(|g| (g, self.completion_tx.clone()));
        tokio::spawn(async move {
            if let Err(err) = supervise(command, child, cancel_rx, notify).await {
                error!(error = %err, "action supervision error");
            }
        });

        Ok(ActionHandle::new(kind, generation, cancel_tx))
    }
}

impl ProcessRunner for RealProcessRunner {
    fn launch_tracked(
        &mut self,
        command: ActionCommand,
        generation: Generation,
    ) -> Result<ActionHandle> {
        self.launch(command, Some(generation))
    }

    fn launch_untracked(&mut self, command: ActionCommand) -> Result<ActionHandle> {
        self.launch(command, None)
    }
}

fn spawn_child(command: &ActionCommand) -> Result<Child> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    cmd.spawn().map_err(|source| PomoError::LaunchError {
        action: command.kind,
        program: command.program.clone(),
        source,
    })
}

/// Wait for the child to exit or for a cancellation request, whichever comes
/// first.
///
/// - Clean exit of a tracked action sends exactly one [`Completion`].
/// - Non-zero exit or a wait error is logged; nothing is sent.
/// - Cancellation kills the child; nothing is sent.
async fn supervise(
    command: ActionCommand,
    mut child: Child,
    mut cancel_rx: oneshot::Receiver<()>,
    notify: Option<(Generation, mpsc::Sender<Completion>)>,
) -> anyhow::Result<()> {
    let action = command.kind;

    if let Some(stdout) = child.stdout.take() {
        forward_lines(action.as_str(), "stdout", stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        forward_lines(action.as_str(), "stderr", stderr);
    }

    // A dropped handle closes the channel without a value; that pattern does
    // not match, so the branch is disabled and we keep waiting for exit.
    tokio::select! {
        status_res = child.wait() => {
            let status = status_res
                .with_context(|| format!("waiting for {action} action {:?}", command.program))?;

            if !status.success() {
                warn!(
                    %action,
                    exit_code = status.code().unwrap_or(-1),
                    "action exited unsuccessfully"
                );
                return Ok(());
            }

            info!(%action, "action exited cleanly");

            if let Some((generation, tx)) = notify {
                if tx.send(Completion { generation }).await.is_err() {
                    debug!(%action, %generation, "completion receiver gone; dropping signal");
                }
            }
        }

        Ok(()) = &mut cancel_rx => {
            info!(%action, "cancellation requested; killing action process");
            if let Err(e) = child.kill().await {
                warn!(%action, error = %e, "failed to kill action process on cancellation");
            }
        }
    }

    Ok(())
}

/// Drain a child pipe so it never blocks, logging each line at debug.
fn forward_lines<R>(action: &'static str, stream: &'static str, pipe: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(pipe).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(action, stream, "{}", line);
        }
    });
}

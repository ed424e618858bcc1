// src/exec/backend.rs

//! Pluggable process runner abstraction.
//!
//! The state machine talks to a `ProcessRunner` instead of spawning processes
//! itself. This keeps the core free of Tokio/process types and makes it easy
//! to swap in a fake runner in tests.
//!
//! - [`RealProcessRunner`](super::RealProcessRunner) spawns OS processes via
//!   `tokio::process::Command`.
//! - Tests can provide their own `ProcessRunner` that records launches and
//!   fires completion signals on demand.

use std::fmt;
use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::errors::Result;
use crate::types::{ActionKind, Generation};

/// A fully built action invocation: which script and with what arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCommand {
    pub kind: ActionKind,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ActionCommand {
    pub fn new(kind: ActionKind, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            kind,
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Single-fire notification that a tracked action exited cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub generation: Generation,
}

/// Cancellable handle to a launched action.
///
/// Dropping the handle does **not** stop the action; only [`cancel`] does.
///
/// [`cancel`]: ActionHandle::cancel
#[derive(Debug)]
pub struct ActionHandle {
    kind: ActionKind,
    generation: Option<Generation>,
    cancel: oneshot::Sender<()>,
}

impl ActionHandle {
    pub fn new(
        kind: ActionKind,
        generation: Option<Generation>,
        cancel: oneshot::Sender<()>,
    ) -> Self {
        Self {
            kind,
            generation,
            cancel,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Generation of a tracked action; `None` for fire-and-forget actions.
    pub fn generation(&self) -> Option<Generation> {
        self.generation
    }

    pub fn is_tracked(&self) -> bool {
        self.generation.is_some()
    }

    /// Request best-effort termination without waiting for it.
    ///
    /// Returns `false` if the action had already finished.
    pub fn cancel(self) -> bool {
        self.cancel.send(()).is_ok()
    }
}

/// Trait abstracting how actions are started.
///
/// Launching is synchronous: an `Err` means the action could not be started
/// at all. What happens after a successful start is reported asynchronously,
/// and only for tracked launches.
pub trait ProcessRunner: Send {
    /// Start an action whose clean exit is reported as a [`Completion`]
    /// carrying `generation`. Failed or cancelled runs report nothing.
    fn launch_tracked(
        &mut self,
        command: ActionCommand,
        generation: Generation,
    ) -> Result<ActionHandle>;

    /// Start an action nobody waits for.
    fn launch_untracked(&mut self, command: ActionCommand) -> Result<ActionHandle>;
}

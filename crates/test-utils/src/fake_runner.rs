use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};

use pomobutton::errors::{PomoError, Result};
use pomobutton::exec::{ActionCommand, ActionHandle, ProcessRunner};
use pomobutton::types::{ActionKind, Generation};
use tokio::sync::oneshot;

/// One call into the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRecord {
    pub command: ActionCommand,
    /// `Some` for tracked launches.
    pub generation: Option<Generation>,
    /// Whether the launch was refused (simulated launch failure).
    pub failed: bool,
}

impl LaunchRecord {
    pub fn kind(&self) -> ActionKind {
        self.command.kind
    }
}

#[derive(Default)]
struct Shared {
    launches: Vec<LaunchRecord>,
    failing: HashSet<ActionKind>,
    /// Cancel receivers of successful launches, indexed like `started`.
    cancels: Vec<oneshot::Receiver<()>>,
    started: Vec<(ActionKind, Option<Generation>, bool)>,
}

impl Shared {
    fn refresh_cancellations(&mut self) {
        for (rx, entry) in self.cancels.iter_mut().zip(self.started.iter_mut()) {
            if !entry.2 && rx.try_recv().is_ok() {
                entry.2 = true;
            }
        }
    }
}

/// A fake runner that:
/// - records every launch (including refused ones)
/// - refuses launches of actions marked with [`FakeRunner::fail_launches_of`]
/// - remembers which launched actions were later cancelled.
///
/// Nothing is executed and no completion is ever sent; tests deliver
/// completions themselves.
///
/// Clones share state, so a test can keep one clone while the machine owns
/// another.
#[derive(Clone, Default)]
pub struct FakeRunner {
    shared: Arc<Mutex<Shared>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_launches_of(&self, kind: ActionKind) {
        self.shared.lock().unwrap().failing.insert(kind);
    }

    pub fn allow_launches_of(&self, kind: ActionKind) {
        self.shared.lock().unwrap().failing.remove(&kind);
    }

    pub fn launches(&self) -> Vec<LaunchRecord> {
        self.shared.lock().unwrap().launches.clone()
    }

    /// Successful launches of `kind`, in order.
    pub fn started_of(&self, kind: ActionKind) -> Vec<LaunchRecord> {
        self.launches()
            .into_iter()
            .filter(|l| l.kind() == kind && !l.failed)
            .collect()
    }

    /// Generation of the latest tracked launch that succeeded.
    pub fn last_generation(&self) -> Option<Generation> {
        self.launches()
            .iter()
            .rev()
            .filter(|l| !l.failed)
            .find_map(|l| l.generation)
    }

    /// Actions that have been asked to stop, in launch order.
    pub fn cancelled(&self) -> Vec<(ActionKind, Option<Generation>)> {
        let mut shared = self.shared.lock().unwrap();
        shared.refresh_cancellations();
        shared
            .started
            .iter()
            .filter(|(_, _, cancelled)| *cancelled)
            .map(|(kind, generation, _)| (*kind, *generation))
            .collect()
    }

    /// Tracked launches that were started and never cancelled.
    pub fn live_tracked(&self) -> Vec<Generation> {
        let mut shared = self.shared.lock().unwrap();
        shared.refresh_cancellations();
        shared
            .started
            .iter()
            .filter(|(_, _, cancelled)| !*cancelled)
            .filter_map(|(_, generation, _)| *generation)
            .collect()
    }

    fn launch(
        &mut self,
        command: ActionCommand,
        generation: Option<Generation>,
    ) -> Result<ActionHandle> {
        let mut shared = self.shared.lock().unwrap();
        let kind = command.kind;
        let failed = shared.failing.contains(&kind);

        shared.launches.push(LaunchRecord {
            command: command.clone(),
            generation,
            failed,
        });

        if failed {
            return Err(PomoError::LaunchError {
                action: kind,
                program: command.program,
                source: io::Error::new(io::ErrorKind::NotFound, "simulated launch failure"),
            });
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        shared.cancels.push(cancel_rx);
        shared.started.push((kind, generation, false));

        Ok(ActionHandle::new(kind, generation, cancel_tx))
    }
}

impl ProcessRunner for FakeRunner {
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

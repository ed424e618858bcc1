// src/engine/runtime.rs

use std::fmt;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::exec::{Completion, ProcessRunner};
use crate::types::ButtonEvent;

use super::machine::{Input, StateMachine};

/// Heartbeat period while a segment is running or paused.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(5);

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Timeout after which a running machine gets a `Tick`. Re-armed after
    /// every wait.
    pub heartbeat_period: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            heartbeat_period: HEARTBEAT_PERIOD,
        }
    }
}

/// Feeds the state machine from its three sources.
///
/// This is a pure IO shell around `StateMachine`, which contains all the
/// timer semantics. The machine is the only thing it mutates, and only from
/// this task.
pub struct Runtime<R: ProcessRunner> {
    machine: StateMachine<R>,
    buttons: mpsc::Receiver<ButtonEvent>,
    completions: mpsc::Receiver<Completion>,
    shutdown: mpsc::Receiver<()>,
    options: RuntimeOptions,
}

impl<R: ProcessRunner> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("machine", &self.machine)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: ProcessRunner> Runtime<R> {
    pub fn new(
        machine: StateMachine<R>,
        buttons: mpsc::Receiver<ButtonEvent>,
        completions: mpsc::Receiver<Completion>,
        shutdown: mpsc::Receiver<()>,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            machine,
            buttons,
            completions,
            shutdown,
            options,
        }
    }

    /// Main event loop.
    ///
    /// While the machine is running or paused this waits on button events,
    /// completion signals and the heartbeat timeout at once, with no priority
    /// among them. Otherwise only buttons (and completions, which the machine
    /// will discard as stale) are awaited. `mpsc::Receiver::recv` is cancel
    /// safe, so an event that loses the race stays queued for the next wait;
    /// only the timeout is thrown away and re-armed.
    ///
    /// Returns the machine once shutdown is requested or the input closes.
    pub async fn run(mut self) -> StateMachine<R> {
        info!("pomobutton runtime started");

        loop {
            let timing = self.machine.is_timing();
            let heartbeat = tokio::time::sleep(self.options.heartbeat_period);

            let input = tokio::select! {
                Some(()) = self.shutdown.recv() => {
                    info!("shutdown requested, stopping runtime");
                    break;
                }
                event = self.buttons.recv() => match event {
                    Some(event) => Input::Button(event),
                    None => {
                        info!("input event channel closed; exiting");
                        break;
                    }
                },
                Some(completion) = self.completions.recv() => Input::Completed(completion),
                _ = heartbeat, if timing => Input::Tick,
            };

            debug!(?input, "runtime received input");
            self.machine.step(input, Instant::now());
        }

        info!(state = self.machine.state().name(), "runtime exiting");
        self.machine
    }
}

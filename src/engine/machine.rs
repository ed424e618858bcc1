// src/engine/machine.rs

//! Pure timer state machine.
//!
//! The machine consumes one [`Input`] at a time and reacts by launching or
//! cancelling actions through its [`ProcessRunner`]. It owns no channels,
//! timers or clocks: the async shell (`engine::runtime::Runtime`) supplies
//! inputs and the current instant.
//!
//! Cycle: `Idle -> AwaitingRelease -> Running <-> Paused -> ... -> Idle`.

use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::ActionPaths;
use crate::engine::session::Session;
use crate::exec::{ActionCommand, ActionHandle, Completion, ProcessRunner};
use crate::types::{ActionKind, ButtonEvent, Generation};

/// Where the machine is within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmState {
    /// No cycle in progress.
    Idle,
    /// `press` was seen; waiting for the release of the same key.
    AwaitingRelease { press: ButtonEvent },
    /// The begin action is running and awaited.
    Running,
    /// The begin action was cancelled and the pause action launched.
    Paused,
}

impl FsmState {
    pub fn name(&self) -> &'static str {
        match self {
            FsmState::Idle => "idle",
            FsmState::AwaitingRelease { .. } => "awaiting-release",
            FsmState::Running => "running",
            FsmState::Paused => "paused",
        }
    }

    /// Running or paused: the states that wait on buttons, completions and
    /// the heartbeat together.
    pub fn is_timing(&self) -> bool {
        matches!(self, FsmState::Running | FsmState::Paused)
    }
}

/// Everything that can drive the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Button(ButtonEvent),
    Completed(Completion),
    /// Heartbeat timeout elapsed without any other input.
    Tick,
}

/// Result of feeding one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: FsmState,
    pub to: FsmState,
    pub heartbeat: bool,
}

impl Step {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

pub struct StateMachine<R: ProcessRunner> {
    state: FsmState,
    session: Session,
    /// The begin action whose completion ends the segment. At most one.
    tracked: Option<ActionHandle>,
    /// Last pause or end action, cancelled at pause-off or the next cycle.
    side_action: Option<ActionHandle>,
    /// Pause toggle, flipped by every press while running or paused.
    ///
    /// Not reset when a cycle is abandoned: after a failed pause launch the
    /// next cycle's first press toggles it back off.
    pause: bool,
    next_generation: Generation,
    actions: ActionPaths,
    runner: R,
}

impl<R: ProcessRunner> std::fmt::Debug for StateMachine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("tracked", &self.tracked)
            .field("side_action", &self.side_action)
            .field("pause", &self.pause)
            .field("next_generation", &self.next_generation)
            .finish_non_exhaustive()
    }
}

impl<R: ProcessRunner> StateMachine<R> {
    pub fn new(actions: ActionPaths, runner: R) -> Self {
        Self {
            state: FsmState::Idle,
            session: Session::new(),
            tracked: None,
            side_action: None,
            pause: false,
            next_generation: Generation::new(1),
            actions,
            runner,
        }
    }

    pub fn state(&self) -> FsmState {
        self.state
    }

    pub fn is_timing(&self) -> bool {
        self.state.is_timing()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Generation of the tracked begin action, if one is alive.
    pub fn tracked_generation(&self) -> Option<Generation> {
        self.tracked.as_ref().and_then(ActionHandle::generation)
    }

    pub fn has_tracked_process(&self) -> bool {
        self.tracked.is_some()
    }

    /// Current value of the pause toggle.
    pub fn pause_flag(&self) -> bool {
        self.pause
    }

    /// Kind of the untracked action still held for cancellation, if any.
    pub fn side_action(&self) -> Option<ActionKind> {
        self.side_action.as_ref().map(ActionHandle::kind)
    }

    /// Feed a single input observed at `now`.
    pub fn step(&mut self, input: Input, now: Instant) -> Step {
        let from = self.state;
        let mut heartbeat = false;

        let to = match (from, input) {
            (FsmState::Idle, Input::Button(ev)) if ev.is_press => self.open_cycle(ev),
            (FsmState::AwaitingRelease { press }, Input::Button(ev)) if ev.releases(&press) => {
                self.begin_segment(now)
            }
            (FsmState::Running | FsmState::Paused, Input::Button(ev)) if ev.is_press => {
                self.toggle_pause(ev, now)
            }
            (FsmState::Running, Input::Completed(done)) if self.is_current(done) => {
                self.finish()
            }
            (state, Input::Tick) if state.is_timing() => {
                heartbeat = true;
                info!(
                    state = state.name(),
                    segment = ?self.session.segment_elapsed(now),
                    accumulated = self.session.accumulated(),
                    "tick"
                );
                state
            }
            (state, Input::Completed(done)) => {
                debug!(
                    state = state.name(),
                    generation = %done.generation,
                    tracked = ?self.tracked_generation(),
                    "ignoring stale completion"
                );
                state
            }
            (state, input) => {
                debug!(state = state.name(), ?input, "input ignored");
                state
            }
        };

        self.state = to;
        if from != to {
            info!(from = from.name(), to = to.name(), "state transition");
        }

        Step {
            from,
            to,
            heartbeat,
        }
    }

    fn is_current(&self, done: Completion) -> bool {
        self.tracked_generation() == Some(done.generation)
    }

    /// Idle + press: start a new cycle and wait for the matching release.
    fn open_cycle(&mut self, press: ButtonEvent) -> FsmState {
        info!(%press, "cycle opened");
        self.session.reset();
        self.cancel_tracked();
        self.cancel_side_action();
        FsmState::AwaitingRelease { press }
    }

    /// Matching release: launch the tracked begin action.
    fn begin_segment(&mut self, now: Instant) -> FsmState {
        self.cancel_tracked();

        let generation = self.next_generation;
        self.next_generation = generation.next();

        let elapsed = self.session.elapsed_text().to_string();
        let command = self.command(ActionKind::Begin, vec![elapsed]);
        match self.runner.launch_tracked(command, generation) {
            Ok(handle) => {
                self.session.start_segment(now);
                self.tracked = Some(handle);
                FsmState::Running
            }
            Err(err) => {
                error!(error = %err, %generation, "begin launch failed; abandoning cycle");
                FsmState::Idle
            }
        }
    }

    /// Press while running or paused: flip the toggle and act on its new value.
    fn toggle_pause(&mut self, press: ButtonEvent, now: Instant) -> FsmState {
        self.pause = !self.pause;
        if self.pause {
            self.pause_on(now)
        } else {
            self.pause_off(press)
        }
    }

    /// Toggle switched on: stop the segment and fire the pause action.
    fn pause_on(&mut self, now: Instant) -> FsmState {
        self.cancel_tracked();
        let segment = self.session.close_segment(now);
        info!(
            segment,
            accumulated = self.session.accumulated(),
            "paused"
        );

        let command = self.command(ActionKind::Pause, Vec::new());
        match self.runner.launch_untracked(command) {
            Ok(handle) => {
                self.side_action = Some(handle);
                FsmState::Paused
            }
            Err(err) => {
                error!(error = %err, "pause launch failed; abandoning cycle");
                FsmState::Idle
            }
        }
    }

    /// Toggle switched off: stop whatever is running (normally the pause
    /// action) and gate on this key's release before resuming.
    fn pause_off(&mut self, press: ButtonEvent) -> FsmState {
        info!(%press, "unpaused");
        self.cancel_tracked();
        self.cancel_side_action();
        FsmState::AwaitingRelease { press }
    }

    /// Tracked begin action completed: fire the end action and close the cycle.
    fn finish(&mut self) -> FsmState {
        self.cancel_tracked();

        let elapsed = self.session.elapsed_text().to_string();
        let command = self.command(ActionKind::End, vec![elapsed.clone()]);
        match self.runner.launch_untracked(command) {
            Ok(handle) => {
                info!(
                    elapsed = %elapsed,
                    accumulated = self.session.accumulated(),
                    "cycle finished"
                );
                self.side_action = Some(handle);
            }
            Err(err) => {
                error!(error = %err, "end launch failed");
            }
        }
        FsmState::Idle
    }

    fn command(&self, kind: ActionKind, args: Vec<String>) -> ActionCommand {
        ActionCommand::new(kind, self.actions.path(kind), args)
    }

    fn cancel_tracked(&mut self) {
        if let Some(handle) = self.tracked.take() {
            let generation = handle.generation();
            if handle.cancel() {
                debug!(?generation, "cancelled tracked action");
            }
        }
    }

    fn cancel_side_action(&mut self) {
        if let Some(handle) = self.side_action.take() {
            let action = handle.kind();
            if handle.cancel() {
                debug!(%action, "cancelled side action");
            }
        }
    }
}

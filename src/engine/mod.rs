// src/engine/mod.rs

//! Timer engine for pomobutton.
//!
//! This module ties together:
//! - the elapsed-time bookkeeping of a cycle ([`session`])
//! - the pure state machine reacting to buttons, completions and ticks
//!   ([`machine`])
//! - the async shell that waits on all input sources and feeds the machine
//!   ([`runtime`])

pub mod machine;
pub mod runtime;
pub mod session;

pub use machine::{FsmState, Input, StateMachine, Step};
pub use runtime::{Runtime, RuntimeOptions, HEARTBEAT_PERIOD};
pub use session::{format_elapsed, Session, ZERO_ELAPSED};

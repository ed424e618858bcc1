// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the begin/pause/end
//! scripts, using `tokio::process::Command`, and reporting clean exits of
//! tracked actions back to the runtime as [`Completion`]s.
//!
//! - [`backend`] provides the `ProcessRunner` trait, the cancellable
//!   `ActionHandle` and the `ActionCommand` description.
//! - [`action_runner`] holds `RealProcessRunner`, the production implementation.

pub mod action_runner;
pub mod backend;

pub use action_runner::RealProcessRunner;
pub use backend::{ActionCommand, ActionHandle, Completion, ProcessRunner};

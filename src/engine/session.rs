// src/engine/session.rs

//! Elapsed-time bookkeeping for one timer cycle.

use std::time::Instant;

/// Text handed to actions before any segment has been closed.
pub const ZERO_ELAPSED: &str = "0";

/// Timing state of the current cycle.
///
/// `accumulated` only grows between two calls to [`Session::reset`].
#[derive(Debug, Clone)]
pub struct Session {
    start_time: Option<Instant>,
    accumulated: f64,
    elapsed_text: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            start_time: None,
            accumulated: 0.0,
            elapsed_text: ZERO_ELAPSED.to_string(),
        }
    }

    /// Forget everything from the previous cycle.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Mark the start of a running segment.
    pub fn start_segment(&mut self, now: Instant) {
        self.start_time = Some(now);
    }

    /// Close the running segment at `now`.
    ///
    /// Adds the segment length to the accumulated total, stores its text form
    /// for the next action launch and returns it in seconds.
    pub fn close_segment(&mut self, now: Instant) -> f64 {
        let segment = self.segment_elapsed(now).unwrap_or(0.0);
        self.accumulated += segment;
        self.elapsed_text = format_elapsed(segment);
        segment
    }

    /// Seconds since the current segment started, if one was started.
    pub fn segment_elapsed(&self, now: Instant) -> Option<f64> {
        self.start_time
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
    }

    pub fn start_time(&self) -> Option<Instant> {
        self.start_time
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn elapsed_text(&self) -> &str {
        &self.elapsed_text
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Shortest decimal text that parses back to exactly `secs`.
///
/// `f64`'s `Display` already produces the minimal round-trip digits without
/// an exponent, e.g. `0`, `2.5`, `1500.000001`.
pub fn format_elapsed(secs: f64) -> String {
    format!("{secs}")
}

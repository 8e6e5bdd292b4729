//! Single-shot countdown timer
//!
//! Timers hold an absolute end time on the simulation clock rather than a
//! decrementing counter, so polling them never depends on how often they are
//! checked.

use serde::{Deserialize, Serialize};

/// One-shot countdown against the simulation clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    /// Absolute clock value at which the timer completes (None = not running)
    end_time: Option<f64>,
}

impl Timer {
    pub const fn new() -> Self {
        Self { end_time: None }
    }

    /// Start counting down `duration` seconds from `now`.
    ///
    /// Ignored while the timer is already running; a pending countdown is
    /// never extended or restarted.
    pub fn start(&mut self, now: f64, duration: f32) {
        if self.end_time.is_none() {
            self.end_time = Some(now + f64::from(duration));
        }
    }

    /// Returns true exactly once when the countdown has elapsed, then resets
    /// the timer to not-running.
    pub fn finished(&mut self, now: f64) -> bool {
        match self.end_time {
            Some(end) if now >= end => {
                self.end_time = None;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.end_time.is_some()
    }

    /// Seconds until completion, clamped to zero (zero when not running)
    pub fn time_left(&self, now: f64) -> f32 {
        match self.end_time {
            Some(end) => (end - now).max(0.0) as f32,
            None => 0.0,
        }
    }

    pub fn stop(&mut self) {
        self.end_time = None;
    }
}

//! Frame clock for the Polaris engine
//!
//! Tracks per-frame delta time and total elapsed time. The delta is pushed in by
//! the platform layer each frame; simulation systems only ever read it.

use serde::{Deserialize, Serialize};

/// Per-frame timing state. Updated once at the start of every frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameClock {
    /// Seconds elapsed since the previous frame
    delta: f32,
    /// Total seconds since the clock was created
    elapsed: f64,
    /// Number of completed frames
    frame: u64,
    /// Upper bound applied to incoming deltas (guards against debugger pauses)
    max_delta: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            frame: 0,
            max_delta: 0.25,
        }
    }

    /// Advance the clock by one frame with the given raw delta in seconds.
    pub fn advance(&mut self, raw_delta: f32) {
        self.delta = raw_delta.clamp(0.0, self.max_delta);
        self.elapsed += self.delta as f64;
        self.frame += 1;
    }

    /// Delta time of the current frame, in seconds.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Total elapsed time, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Index of the current frame (0 before the first `advance`).
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

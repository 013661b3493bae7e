//! Runtime counters for one simulation session.
//!
//! Collected by the application service as frames arrive and exposed in
//! the dashboard snapshot.  Counters reset when the session restarts.

use serde::{Deserialize, Serialize};

/// Per-session frame and pipeline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Frames delivered by the host loop while running.
    pub frames: u64,
    /// Frames accepted by the tick gate.
    pub ticks: u64,
    /// Frames rejected by the tick gate.
    pub dropped_frames: u64,
    pub syncs: u64,
    pub alerts_raised: u64,
    /// Samples the pipeline refused because of an epoch mismatch.
    pub stale_samples: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, accepted: bool) {
        self.frames += 1;
        if accepted {
            self.ticks += 1;
        } else {
            self.dropped_frames += 1;
        }
    }

    /// Fraction of frames that became ticks, 0.0 before any frame.
    pub fn acceptance_ratio(&self) -> f32 {
        if self.frames == 0 {
            0.0
        } else {
            self.ticks as f32 / self.frames as f32
        }
    }
}

//! Host clock adapter.
//!
//! Monotonic milliseconds come from `std::time::Instant`; the wall clock
//! used for labels comes from `chrono`.

use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::app::ports::ClockPort;

/// Clock anchored at construction time.
pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for HostClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//! Elapsed-time gates.
//!
//! The frame loop may run much faster than the simulation.  Two gates
//! sample it down:
//!
//! ```text
//!  frames (~60 Hz) ──▶ [tick gate ≥ 100 ms] ──▶ ESM tick (10 Hz)
//!                                                   │
//!                                [sync gate > 1000 ms] ──▶ TFP sync (1 Hz)
//! ```
//!
//! A gate compares the injected clock against its last-fired timestamp.
//! Frames that arrive too early are dropped, never queued, and nothing
//! sleeps, so a step is fully deterministic under a manual clock.

/// Whether the gate opens exactly at the interval or only after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEdge {
    /// Fire when `elapsed >= interval`.
    Inclusive,
    /// Fire when `elapsed > interval`.
    Exclusive,
}

/// Rate-limited sampling of a faster-updating source.
#[derive(Debug, Clone)]
pub struct RateGate {
    interval_ms: u64,
    edge: GateEdge,
    last_fired_ms: u64,
}

impl RateGate {
    /// Gate that first opens `interval_ms` after `origin_ms`.
    pub fn new(interval_ms: u64, edge: GateEdge, origin_ms: u64) -> Self {
        Self {
            interval_ms,
            edge,
            last_fired_ms: origin_ms,
        }
    }

    /// Returns `true` and re-arms if the interval has elapsed at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_fired_ms);
        let open = match self.edge {
            GateEdge::Inclusive => elapsed >= self.interval_ms,
            GateEdge::Exclusive => elapsed > self.interval_ms,
        };
        if open {
            self.last_fired_ms = now_ms;
        }
        open
    }

    /// Restart the interval from `now_ms` without firing.
    pub fn rearm(&mut self, now_ms: u64) {
        self.last_fired_ms = now_ms;
    }

    pub fn last_fired_ms(&self) -> u64 {
        self.last_fired_ms
    }
}

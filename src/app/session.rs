//! Per-run mutable state.
//!
//! Everything a simulation run mutates lives in one [`Session`]: the
//! environment machine, the telemetry pipeline, both rate gates, the most
//! recent sample and the run counters.  Restart replaces the record
//! wholesale, so no field can leak from one run into the next.

use crate::config::SimConfig;
use crate::diagnostics::SessionStats;
use crate::environment::{EnvironmentMachine, SimulationSample};
use crate::scheduler::{GateEdge, RateGate};
use crate::telemetry::{TelemetryPipeline, Timestamp};

pub struct Session {
    pub epoch: u64,
    pub esm: EnvironmentMachine,
    pub pipeline: TelemetryPipeline,
    /// Frame → tick throttle.
    pub tick_gate: RateGate,
    /// Tick → sync throttle, polled only on accepted ticks.
    pub sync_gate: RateGate,
    pub latest: Option<SimulationSample>,
    pub stats: SessionStats,
    pub started: Timestamp,
}

impl Session {
    pub fn new(epoch: u64, config: &SimConfig, started: Timestamp) -> Self {
        Self {
            epoch,
            esm: EnvironmentMachine::new(epoch, config.clone()),
            pipeline: TelemetryPipeline::new(epoch, config, &started),
            tick_gate: RateGate::new(config.tick_interval_ms, GateEdge::Inclusive, started.ms),
            sync_gate: RateGate::new(config.sync_interval_ms, GateEdge::Exclusive, started.ms),
            latest: None,
            stats: SessionStats::new(),
            started,
        }
    }

    /// Restart both intervals from `now_ms` without firing.
    pub fn rearm_gates(&mut self, now_ms: u64) {
        self.tick_gate.rearm(now_ms);
        self.sync_gate.rearm(now_ms);
    }
}

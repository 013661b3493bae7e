//! Read-only views handed to display collaborators.

use serde::Serialize;

use crate::diagnostics::SessionStats;
use crate::environment::SimulationSample;
use crate::fsm::OperatingState;
use crate::sensors::wind::WindVector;
use crate::telemetry::TelemetryPoint;
use crate::telemetry::alerts::LogEntry;
use crate::telemetry::forecast::ForecastPoint;
use crate::telemetry::nodes::SensorNode;

/// Live machine status, readable at any time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusView {
    pub epoch: u64,
    pub state: OperatingState,
    pub intensity: f32,
    pub wind: WindVector,
    pub spray_intensity: f32,
    pub paused: bool,
}

/// Everything a dashboard renders, copied out of the current session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub status: StatusView,
    pub latest: Option<SimulationSample>,
    /// Oldest first.
    pub history: Vec<TelemetryPoint>,
    pub trajectory: Vec<ForecastPoint>,
    /// Oldest first.
    pub log: Vec<LogEntry>,
    pub nodes: Vec<SensorNode>,
    pub hazardous: bool,
    pub stats: SessionStats,
}

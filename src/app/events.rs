//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port, one at a time and in
//! order.  Adapters on the other side decide what to do with them: log
//! them, feed a chart, forward them to a display collaborator.

use serde::Serialize;

use crate::fsm::OperatingState;
use crate::sensors::wind::WindVector;
use crate::telemetry::alerts::LogEntry;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A session has started (carries its epoch and initial state).
    Started { epoch: u64, state: OperatingState },

    /// The environment machine transitioned between states.
    StateChanged {
        from: OperatingState,
        to: OperatingState,
    },

    /// Per-sync telemetry update.
    Telemetry(TelemetryUpdate),

    /// An entry was appended to the event log.
    Log(LogEntry),

    /// The previous session was discarded and a new one started.
    Restarted { epoch: u64 },

    Paused,
    Resumed,
}

/// Data pushed to display collaborators on every sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryUpdate {
    pub epoch: u64,
    pub pm10: f32,
    pub predicted_pm25: f32,
    pub state: OperatingState,
    pub wind: WindVector,
}

//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It carries the dust reading for the current tick, the
//! actuation counters, the sprinkler command and the configuration.

use serde::Serialize;

use crate::config::SimConfig;

// ---------------------------------------------------------------------------
// Dust reading (read-only to state handlers; written by the sensor hub)
// ---------------------------------------------------------------------------

/// One tick's worth of particulate measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DustReading {
    /// Instantaneous PM2.5 concentration (µg/m³).
    pub pm25: f32,
    /// Instantaneous PM10 concentration (µg/m³).
    pub pm10: f32,
    /// One-step-ahead PM2.5 forecast (µg/m³).
    pub predicted_pm25: f32,
}

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; read after the tick)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request actuator actions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActuatorCommands {
    /// Sprinkler output, 0.0 (off) to 1.0 (full).
    pub spray_intensity: f32,
}

impl ActuatorCommands {
    /// Sprinklers off.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Sensor data --
    /// Latest dust reading.  Updated before each FSM tick.
    pub reading: DustReading,

    // -- Actuation counters --
    /// Ticks spent in the current actuation episode.
    pub mitigation_ticks: u32,
    /// Remaining recovery ticks during which MONITOR cannot re-escalate.
    pub recovery_hold: u32,

    // -- Actuator outputs --
    pub commands: ActuatorCommands,

    // -- Configuration --
    pub config: SimConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SimConfig) -> Self {
        Self {
            reading: DustReading::default(),
            mitigation_ticks: 0,
            recovery_hold: 0,
            commands: ActuatorCommands::all_off(),
            config,
        }
    }

    /// Returns `true` while the post-actuation grace period is running.
    pub fn recovery_pending(&self) -> bool {
        self.recovery_hold > 0
    }
}

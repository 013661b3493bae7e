//! Sensor subsystem: the synthetic dust field, the wind vane and the
//! aggregating [`SensorHub`].
//!
//! The hub owns both models and produces a [`SensorSnapshot`] each
//! accepted tick.  The dust reading from the snapshot is written into
//! `FsmContext.reading` before the state machine runs.

pub mod dust;
pub mod wind;

use crate::app::ports::NoiseSource;
use crate::config::SimConfig;
use crate::fsm::context::DustReading;
use dust::DustField;
use wind::{WindVane, WindVector};

/// A point-in-time snapshot of every simulated sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    pub reading: DustReading,
    pub wind: WindVector,
}

/// Aggregates the dust field and wind vane.
pub struct SensorHub {
    pub dust: DustField,
    pub wind: WindVane,
}

impl SensorHub {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            dust: DustField::new(config.initial_intensity, config.emission_rate),
            wind: WindVane::new(config.wind_rotate_ticks, config.wind_step_deg),
        }
    }

    /// Advance the wind timer and sample the dust field.
    pub fn read_all(&mut self, noise: &mut impl NoiseSource) -> SensorSnapshot {
        let wind = self.wind.advance();
        let reading = self.dust.sample(noise);
        SensorSnapshot { reading, wind }
    }
}

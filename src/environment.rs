//! Environmental state machine.
//!
//! Owns the single source of truth for dust intensity and operating
//! state, and decides sprinkler output.  One call to
//! [`EnvironmentMachine::tick`] is one accepted simulation tick:
//!
//! ```text
//!  SensorHub.read_all ──▶ emission (old state) ──▶ Fsm.tick ──▶ spray (new state)
//!     wind + reading         intensity update       rules         SimulationSample
//! ```
//!
//! The intensity update always uses the coefficient of the state the
//! tick *started* in; the transition is evaluated afterwards.

use serde::Serialize;

use crate::app::ports::NoiseSource;
use crate::config::SimConfig;
use crate::fsm::context::{DustReading, FsmContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, OperatingState};
use crate::sensors::wind::WindVector;
use crate::sensors::{SensorHub, SensorSnapshot};

/// One ESM output.  Immutable once emitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationSample {
    /// Session that produced this sample.
    pub epoch: u64,
    pub pm25: f32,
    pub pm10: f32,
    pub predicted_pm25: f32,
    pub state: OperatingState,
    pub wind: WindVector,
    /// Sprinkler output for `state`, 0.0-1.0.
    pub spray_intensity: f32,
    /// Dust intensity after this tick's update, 0.0-1.0.
    pub intensity: f32,
}

pub struct EnvironmentMachine {
    epoch: u64,
    fsm: Fsm,
    ctx: FsmContext,
    sensors: SensorHub,
}

impl EnvironmentMachine {
    /// Build a machine in NORMAL at the configured initial intensity.
    pub fn new(epoch: u64, config: SimConfig) -> Self {
        let sensors = SensorHub::new(&config);
        let mut ctx = FsmContext::new(config);
        let mut fsm = Fsm::new(build_state_table(), OperatingState::Normal);
        fsm.start(&mut ctx);
        Self {
            epoch,
            fsm,
            ctx,
            sensors,
        }
    }

    /// Run one accepted tick with sensor readings drawn from `noise`.
    pub fn tick(&mut self, noise: &mut impl NoiseSource) -> SimulationSample {
        let snapshot = self.sensors.read_all(noise);
        self.step(snapshot)
    }

    /// Run one accepted tick against an externally supplied reading.
    ///
    /// The wind timer still advances, so this is a drop-in replacement
    /// for [`tick`](Self::tick) when replaying recorded data.
    pub fn tick_with_reading(&mut self, reading: DustReading) -> SimulationSample {
        let wind = self.sensors.wind.advance();
        self.step(SensorSnapshot { reading, wind })
    }

    fn step(&mut self, snapshot: SensorSnapshot) -> SimulationSample {
        // 1. Emission from the pre-transition state.
        let coefficient = self.emission_coefficient(self.fsm.current_state());
        let intensity = self.sensors.dust.apply_emission(coefficient);

        // 2. State rules.
        self.ctx.reading = snapshot.reading;
        self.fsm.tick(&mut self.ctx);

        // 3. Actuator output follows the post-transition state.
        SimulationSample {
            epoch: self.epoch,
            pm25: snapshot.reading.pm25,
            pm10: snapshot.reading.pm10,
            predicted_pm25: snapshot.reading.predicted_pm25,
            state: self.fsm.current_state(),
            wind: snapshot.wind,
            spray_intensity: self.ctx.commands.spray_intensity,
            intensity,
        }
    }

    fn emission_coefficient(&self, state: OperatingState) -> f32 {
        let cfg = &self.ctx.config;
        match state {
            OperatingState::Mitigation => cfg.mitigation_emission,
            OperatingState::PredictiveActuation => cfg.predictive_emission,
            _ => cfg.ambient_emission,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> OperatingState {
        self.fsm.current_state()
    }

    pub fn intensity(&self) -> f32 {
        self.sensors.dust.intensity()
    }

    pub fn wind(&self) -> WindVector {
        self.sensors.wind.current()
    }

    pub fn spray_intensity(&self) -> f32 {
        self.ctx.commands.spray_intensity
    }

    /// Ticks spent in the current actuation episode.
    pub fn mitigation_ticks(&self) -> u32 {
        self.ctx.mitigation_ticks
    }

    /// Remaining recovery-hold ticks.
    pub fn recovery_hold(&self) -> u32 {
        self.ctx.recovery_hold
    }
}

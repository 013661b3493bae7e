//! Simulation configuration parameters
//!
//! All tunable parameters for the DustVision simulation core.
//! Values can be overridden from a JSON file (see
//! [`JsonConfigStore`](crate::adapters::config_file::JsonConfigStore)).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- Timing ---
    /// Minimum spacing between accepted simulation ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Telemetry sync fires when strictly more than this has elapsed (milliseconds)
    pub sync_interval_ms: u64,

    // --- Wind ---
    /// Accepted ticks between wind rotations
    pub wind_rotate_ticks: u32,
    /// Rotation applied on each wind change (degrees)
    pub wind_step_deg: f32,

    // --- Dust dynamics ---
    /// Dust intensity at session start (0.0-1.0)
    pub initial_intensity: f32,
    /// Intensity change per tick per unit of emission coefficient
    pub emission_rate: f32,
    /// Emission coefficient when no sprinkler is running (net accumulation)
    pub ambient_emission: f32,
    /// Emission coefficient while in MITIGATION
    pub mitigation_emission: f32,
    /// Emission coefficient while in PREDICTIVE_ACTUATION
    pub predictive_emission: f32,

    // --- PM2.5 thresholds (µg/m³) ---
    /// Reactive threshold: measured PM2.5 above this forces MITIGATION
    pub mitigation_threshold_pm25: f32,
    /// Proactive threshold: forecast PM2.5 above this starts PREDICTIVE_ACTUATION
    pub predictive_threshold_pm25: f32,
    /// Measured PM2.5 above this keeps the site in MONITOR
    pub monitor_threshold_pm25: f32,
    /// Measured PM2.5 must be at or below this to end an actuation episode
    pub release_threshold_pm25: f32,

    // --- Actuation timers (ticks) ---
    /// Minimum dwell inside an actuation state
    pub min_mitigation_ticks: u32,
    /// Grace period in MONITOR after an actuation episode ends
    pub recovery_hold_ticks: u32,

    // --- Sprinklers ---
    /// Spray intensity while in MITIGATION (0.0-1.0)
    pub mitigation_spray: f32,
    /// Spray intensity while in PREDICTIVE_ACTUATION (0.0-1.0)
    pub predictive_spray: f32,

    // --- Alerts ---
    /// Forecast PM10 above this raises an ALERT
    pub alert_threshold_pm10: f32,
    /// Minimum spacing between ALERT log entries (milliseconds)
    pub alert_cooldown_ms: u64,

    // --- Noise ---
    /// Fixed RNG seed for reproducible runs; `None` seeds from the clock
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 100,  // 10 Hz simulation
            sync_interval_ms: 1000, // 1 Hz dashboard

            // Wind
            wind_rotate_ticks: 40,
            wind_step_deg: 45.0,

            // Dust dynamics
            initial_intensity: 0.15,
            emission_rate: 0.005,
            ambient_emission: 0.4,
            mitigation_emission: -4.0,
            predictive_emission: -1.5,

            // Thresholds
            mitigation_threshold_pm25: 90.0,
            predictive_threshold_pm25: 75.0,
            monitor_threshold_pm25: 40.0,
            release_threshold_pm25: 45.0,

            // Actuation timers
            min_mitigation_ticks: 80,
            recovery_hold_ticks: 30,

            // Sprinklers
            mitigation_spray: 1.0,
            predictive_spray: 0.6,

            // Alerts
            alert_threshold_pm10: 40.0,
            alert_cooldown_ms: 4000,

            rng_seed: None,
        }
    }
}

impl SimConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.sync_interval_ms < self.tick_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "sync_interval_ms must be >= tick_interval_ms",
            ));
        }
        if self.wind_rotate_ticks == 0 {
            return Err(ConfigError::ValidationFailed("wind_rotate_ticks must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.initial_intensity) {
            return Err(ConfigError::ValidationFailed(
                "initial_intensity must be within 0.0-1.0",
            ));
        }
        if !self.emission_rate.is_finite() || self.emission_rate <= 0.0 {
            return Err(ConfigError::ValidationFailed("emission_rate must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.mitigation_spray)
            || !(0.0..=1.0).contains(&self.predictive_spray)
        {
            return Err(ConfigError::ValidationFailed(
                "spray levels must be within 0.0-1.0",
            ));
        }
        if self.mitigation_threshold_pm25 <= self.monitor_threshold_pm25 {
            return Err(ConfigError::ValidationFailed(
                "mitigation threshold must be above monitor threshold",
            ));
        }
        if self.alert_threshold_pm10 < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "alert_threshold_pm10 must be >= 0",
            ));
        }
        Ok(())
    }
}

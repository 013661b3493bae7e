//! Synthetic particulate field.
//!
//! Holds the site's scalar dust intensity and turns it into PM2.5 / PM10
//! readings.  Sprinklers act on the field through the emission
//! coefficient chosen by the caller from the operating state.
//!
//! ```text
//!   pm25      = 20 + intensity × 120 + U[-3, 3)
//!   pm10      = pm25 × U[1.5, 1.7)
//!   forecast  = pm25 × 1.1 + U[0, 10)
//!   intensity = clamp(intensity + rate × coefficient, 0, 1)
//! ```

use crate::app::ports::NoiseSource;
use crate::fsm::context::DustReading;

const PM25_BASELINE: f32 = 20.0;
const PM25_PER_INTENSITY: f32 = 120.0;
const PM25_NOISE: f32 = 3.0;
const PM10_RATIO_MIN: f32 = 1.5;
const PM10_RATIO_MAX: f32 = 1.7;
const FORECAST_GAIN: f32 = 1.1;
const FORECAST_NOISE_MAX: f32 = 10.0;

pub struct DustField {
    intensity: f32,
    emission_rate: f32,
}

impl DustField {
    pub fn new(initial_intensity: f32, emission_rate: f32) -> Self {
        Self {
            intensity: initial_intensity.clamp(0.0, 1.0),
            emission_rate,
        }
    }

    /// Current intensity, always within `[0, 1]`.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Sample the field at the current intensity.
    pub fn sample(&self, noise: &mut impl NoiseSource) -> DustReading {
        let pm25 = PM25_BASELINE
            + self.intensity * PM25_PER_INTENSITY
            + noise.uniform(-PM25_NOISE, PM25_NOISE);
        let pm10 = pm25 * noise.uniform(PM10_RATIO_MIN, PM10_RATIO_MAX);
        let predicted_pm25 = pm25 * FORECAST_GAIN + noise.uniform(0.0, FORECAST_NOISE_MAX);
        DustReading {
            pm25,
            pm10,
            predicted_pm25,
        }
    }

    /// Apply one tick of emission (positive) or clearing (negative).
    pub fn apply_emission(&mut self, coefficient: f32) -> f32 {
        self.intensity = (self.intensity + self.emission_rate * coefficient).clamp(0.0, 1.0);
        debug_assert!(
            (0.0..=1.0).contains(&self.intensity),
            "dust intensity escaped [0, 1]: {}",
            self.intensity
        );
        self.intensity
    }
}

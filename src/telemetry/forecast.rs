//! Short-horizon PM10 forecasting.
//!
//! Two pieces: a smoothed one-step forecast that never reads below the
//! current measurement, and a 16-point trajectory (now + 15 minutes)
//! that drifts with the wind.  The trajectory is recomputed from scratch
//! on every sync.

use serde::Serialize;

use super::Timestamp;
use crate::app::ports::NoiseSource;

/// Points in a trajectory: the current instant plus 15 projected minutes.
pub const TRAJECTORY_LEN: usize = 16;

const FORECAST_GAIN: f32 = 1.05;
const FORECAST_NOISE: f32 = 1.5;
/// Margin applied when noise would pull the forecast below the measurement.
const FORECAST_FLOOR_MARGIN: f32 = 0.5;
const WIND_DRIFT_PER_MINUTE: f32 = 1.5;
const TRAJECTORY_NOISE: f32 = 0.5;

/// Fixed-capacity trajectory buffer.
pub type Trajectory = heapless::Vec<ForecastPoint, TRAJECTORY_LEN>;

/// One point of the projected trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// `"Now"` for the first point, `HH:MM:SS` for the rest.
    pub time: String,
    pub predicted: f32,
}

/// Draw forecast noise and compute the smoothed forecast.
pub fn short_term_forecast(actual_pm10: f32, noise: &mut impl NoiseSource) -> f32 {
    forecast_with_noise(actual_pm10, noise.uniform(-FORECAST_NOISE, FORECAST_NOISE))
}

/// `actual × 1.05 + noise`, raised to `actual + 0.5` if it would read
/// below `actual`.
pub fn forecast_with_noise(actual_pm10: f32, noise: f32) -> f32 {
    let forecast = actual_pm10 * FORECAST_GAIN + noise;
    let forecast = if forecast < actual_pm10 {
        actual_pm10 + FORECAST_FLOOR_MARGIN
    } else {
        forecast
    };
    debug_assert!(forecast >= actual_pm10, "forecast below measurement");
    forecast
}

/// Project `forecast` forward one point per minute.
pub fn project_trajectory(
    forecast: f32,
    wind_angle_rad: f32,
    now: &Timestamp,
    noise: &mut impl NoiseSource,
) -> Trajectory {
    let drift = wind_angle_rad.sin() * WIND_DRIFT_PER_MINUTE;
    let mut points = Trajectory::new();
    push_point(
        &mut points,
        ForecastPoint {
            time: "Now".to_owned(),
            predicted: forecast,
        },
    );

    let mut projected = forecast;
    for minute in 1..TRAJECTORY_LEN as i64 {
        let jitter = noise.uniform(-TRAJECTORY_NOISE, TRAJECTORY_NOISE);
        projected = (projected + drift + jitter).max(0.0);
        push_point(
            &mut points,
            ForecastPoint {
                time: now.plus_minutes(minute).label(),
                predicted: projected,
            },
        );
    }
    debug_assert_eq!(points.len(), TRAJECTORY_LEN);
    points
}

fn push_point(points: &mut Trajectory, point: ForecastPoint) {
    let pushed = points.push(point).is_ok();
    debug_assert!(pushed, "trajectory overflow");
}

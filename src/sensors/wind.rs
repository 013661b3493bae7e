//! Site wind vane.
//!
//! Wind direction is independent of the dust dynamics: a tick counter
//! rotates it by a fixed step every `wind_rotate_ticks` accepted ticks.

use serde::Serialize;

/// Wind direction reported to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindVector {
    /// Direction in degrees, always within `[0, 360)`.
    pub angle_deg: f32,
    /// Short label: `"N"` at start, `"VAR"` once the wind has shifted.
    pub name: &'static str,
}

impl WindVector {
    pub const fn calm_north() -> Self {
        Self {
            angle_deg: 0.0,
            name: "N",
        }
    }

    pub fn angle_rad(&self) -> f32 {
        self.angle_deg.to_radians()
    }
}

impl Default for WindVector {
    fn default() -> Self {
        Self::calm_north()
    }
}

pub struct WindVane {
    current: WindVector,
    ticks: u32,
    rotate_every: u32,
    step_deg: f32,
}

impl WindVane {
    pub fn new(rotate_every: u32, step_deg: f32) -> Self {
        Self {
            current: WindVector::calm_north(),
            ticks: 0,
            rotate_every: rotate_every.max(1),
            step_deg,
        }
    }

    /// Count one accepted tick; rotate when the period elapses.
    pub fn advance(&mut self) -> WindVector {
        self.ticks += 1;
        if self.ticks >= self.rotate_every {
            self.ticks = 0;
            self.current = WindVector {
                angle_deg: (self.current.angle_deg + self.step_deg).rem_euclid(360.0),
                name: "VAR",
            };
            log::debug!("Wind shifted to {:.0}°", self.current.angle_deg);
        }
        self.current
    }

    pub fn current(&self) -> WindVector {
        self.current
    }
}

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const MARS_GRAVITY: f64 = 3.7114; // m/s^2
pub const EARTH_GRAVITY: f64 = 9.807; // m/s^2, used to convert Isp to exhaust velocity

/// Fixed internal sub-step, s.
pub const FORWARD_TIME_STEP: f64 = 0.01;

// ---------------------------------------------------------------------------
// Lander state: planar position, velocity, mass
// ---------------------------------------------------------------------------

/// Snapshot of the vehicle at one simulation instant.
/// Frame: x = horizontal (downrange), y = vertical (altitude), origin at the landing pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub time: f64,              // s since session start
    pub pos: Vector2<f64>,      // m   [x, z]
    pub vel: Vector2<f64>,      // m/s [vx, vz]
    pub mass: f64,              // kg
}

impl State {
    pub fn new(time: f64, pos: Vector2<f64>, vel: Vector2<f64>, mass: f64) -> Self {
        Self { time, pos, vel, mass }
    }

    /// Advance by a derivative scaled by dt. No clamping: altitude and mass
    /// may undershoot their floors by one step.
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            mass: self.mass + d.dmass * dt,
        }
    }

    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    pub fn downrange(&self) -> f64 {
        self.pos.x
    }

    pub fn vertical_speed(&self) -> f64 {
        self.vel.y
    }

    pub fn horizontal_speed(&self) -> f64 {
        self.vel.x
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: Vector2<f64>,   // velocity
    pub dvel: Vector2<f64>,   // acceleration
    pub dmass: f64,           // propellant flow (negative while burning)
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,
    /// Upper bound on sub-steps taken by one `advance` call.
    pub max_substeps_per_advance: usize,
    /// Upper bound on steps taken by one forecast.
    pub max_forecast_steps: usize,
    /// Keep only states newer than `head.time - retention` seconds.
    pub history_retention: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: FORWARD_TIME_STEP,            // 100 Hz
            max_substeps_per_advance: 100_000, // 1000 s of catch-up at 100 Hz
            max_forecast_steps: 200_000,
            history_retention: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidConfig(format!("dt must be positive, got {}", self.dt)));
        }
        if self.max_substeps_per_advance == 0 {
            return Err(SimError::InvalidConfig("max_substeps_per_advance must be > 0".into()));
        }
        if self.max_forecast_steps == 0 {
            return Err(SimError::InvalidConfig("max_forecast_steps must be > 0".into()));
        }
        if let Some(secs) = self.history_retention {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "history_retention must be positive, got {}",
                    secs
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_scales_every_field() {
        let s = State::new(1.0, Vector2::new(10.0, 100.0), Vector2::new(2.0, -3.0), 1800.0);
        let d = Deriv {
            dpos: s.vel,
            dvel: Vector2::new(0.5, -1.0),
            dmass: -4.0,
        };
        let n = s.apply(&d, 0.5);
        assert!((n.time - 1.5).abs() < 1e-12);
        assert!((n.pos.x - 11.0).abs() < 1e-12);
        assert!((n.pos.y - 98.5).abs() < 1e-12);
        assert!((n.vel.y + 3.5).abs() < 1e-12);
        assert!((n.mass - 1798.0).abs() < 1e-12);
    }

    #[test]
    fn apply_does_not_clamp_floors() {
        let s = State::new(0.0, Vector2::new(0.0, 0.1), Vector2::new(0.0, -20.0), 1.0);
        let d = Deriv {
            dpos: s.vel,
            dvel: Vector2::zeros(),
            dmass: -200.0,
        };
        let n = s.apply(&d, 0.01);
        assert!(n.altitude() < 0.0);
        assert!(n.mass < 0.0);
    }

    #[test]
    fn accessors_read_the_planar_frame() {
        let s = State::new(0.0, Vector2::new(250.0, 40.0), Vector2::new(3.0, -4.0), 1600.0);
        assert_eq!(s.downrange(), 250.0);
        assert_eq!(s.altitude(), 40.0);
        assert_eq!(s.horizontal_speed(), 3.0);
        assert_eq!(s.vertical_speed(), -4.0);
        assert!((s.speed() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
        let bad = SimConfig { dt: 0.0, ..SimConfig::default() };
        assert!(bad.validate().is_err());
        let bad = SimConfig { history_retention: Some(-1.0), ..SimConfig::default() };
        assert!(bad.validate().is_err());
    }
}

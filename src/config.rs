use std::fs;
use std::path::Path;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::{SimConfig, State};
use crate::error::Result;
use crate::vehicle::{InitialConditions, VehicleParams};

/// Everything fixed at process start: vehicle, initial conditions, stepping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
    pub vehicle: VehicleParams,
    pub initial: InitialConditions,
    pub sim: SimConfig,
}

impl LanderConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.vehicle.validate()?;
        self.initial.validate()?;
        self.sim.validate()
    }

    /// Session start state: initial conditions at full wet mass, t = 0.
    pub fn initial_state(&self) -> State {
        State::new(
            0.0,
            Vector2::new(self.initial.x, self.initial.z),
            Vector2::new(self.initial.vx, self.initial.vz),
            self.vehicle.wet_mass,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn default_initial_state() {
        let s = LanderConfig::default().initial_state();
        assert_eq!(s.time, 0.0);
        assert_eq!(s.pos, Vector2::new(2000.0, 1500.0));
        assert_eq!(s.vel, Vector2::new(100.0, -75.0));
        assert_eq!(s.mass, 1905.0);
    }

    #[test]
    fn nested_partial_json() {
        let c = LanderConfig::from_json_str(
            r#"{ "initial": { "z": 800.0 }, "sim": { "history_retention": 30.0 } }"#,
        )
        .unwrap();
        assert_eq!(c.initial.z, 800.0);
        assert_eq!(c.initial.x, 2000.0);
        assert_eq!(c.sim.history_retention, Some(30.0));
        assert_eq!(c.sim.dt, 0.01);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = LanderConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LanderConfig::from_json_file("/nonexistent/lander.json").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}

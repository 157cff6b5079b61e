pub mod params;
pub mod thrust;

pub use params::{presets, InitialConditions, VehicleParams, VehicleParamsBuilder};
pub use thrust::{Thrust, ThrustCommand, ThrustModel};

use crate::error::Result;

/// Validated vehicle together with its derived thrust model.
#[derive(Debug, Clone, PartialEq)]
pub struct Lander {
    pub params: VehicleParams,
    pub engine: ThrustModel,
}

impl Lander {
    pub fn new(params: VehicleParams) -> Result<Self> {
        params.validate()?;
        let engine = ThrustModel::new(&params);
        Ok(Self { params, engine })
    }

    pub fn dry_mass(&self) -> f64 {
        self.params.dry_mass
    }

    pub fn gravity(&self) -> f64 {
        self.params.gravity
    }

    pub fn thrust(&self, cmd: &ThrustCommand, mass: f64) -> Thrust {
        self.engine.compute(cmd, mass)
    }
}

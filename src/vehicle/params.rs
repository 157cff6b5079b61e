use serde::{Deserialize, Serialize};

use crate::dynamics::state::{EARTH_GRAVITY, MARS_GRAVITY};
use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Vehicle parameters (fixed for the lifetime of a session)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    pub name: String,
    pub dry_mass: f64,          // kg
    pub wet_mass: f64,          // kg, mass at session start
    pub isp: f64,               // s
    pub thrusters: u32,
    pub throttle_min: f64,      // fraction of rating at zero throttle
    pub throttle_max: f64,      // fraction of rating at full throttle
    pub thruster_rating: f64,   // N per thruster
    pub cant_angle: f64,        // deg, thruster cant from the thrust axis
    pub gravity: f64,           // m/s^2, local surface gravity
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            name: "MSL Descent Stage".into(),
            dry_mass: 1505.0,
            wet_mass: 1905.0,
            isp: 225.0,
            thrusters: 6,
            throttle_min: 0.3,
            throttle_max: 0.8,
            thruster_rating: 3100.0,
            cant_angle: 27.0,
            gravity: MARS_GRAVITY,
        }
    }
}

impl VehicleParams {
    pub fn propellant_mass(&self) -> f64 {
        self.wet_mass - self.dry_mass
    }

    /// Ideal delta-v (Tsiolkovsky), ignoring cant losses.
    pub fn delta_v(&self) -> f64 {
        self.isp * EARTH_GRAVITY * (self.wet_mass / self.dry_mass).ln()
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(SimError::InvalidVehicle(msg));
        if !(self.dry_mass.is_finite() && self.dry_mass > 0.0) {
            return fail(format!("dry mass must be positive, got {}", self.dry_mass));
        }
        if !(self.wet_mass.is_finite() && self.wet_mass >= self.dry_mass) {
            return fail(format!(
                "wet mass {} must be at least dry mass {}",
                self.wet_mass, self.dry_mass
            ));
        }
        if !(self.isp.is_finite() && self.isp > 0.0) {
            return fail(format!("isp must be positive, got {}", self.isp));
        }
        if self.thrusters == 0 {
            return fail("at least one thruster is required".into());
        }
        if !(self.throttle_min >= 0.0 && self.throttle_min <= self.throttle_max)
            || !self.throttle_max.is_finite()
        {
            return fail(format!(
                "throttle bounds must satisfy 0 <= min <= max, got {} / {}",
                self.throttle_min, self.throttle_max
            ));
        }
        if !(self.thruster_rating.is_finite() && self.thruster_rating > 0.0) {
            return fail(format!("thruster rating must be positive, got {}", self.thruster_rating));
        }
        if !(self.cant_angle >= 0.0 && self.cant_angle < 90.0) {
            return fail(format!("cant angle must be in [0, 90) deg, got {}", self.cant_angle));
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return fail(format!("gravity must be positive, got {}", self.gravity));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Initial conditions
// ---------------------------------------------------------------------------

/// Starting point of every session. Mass is taken from the vehicle's wet mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    pub x: f64,     // m
    pub z: f64,     // m
    pub vx: f64,    // m/s
    pub vz: f64,    // m/s
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self { x: 2000.0, z: 1500.0, vx: 100.0, vz: -75.0 }
    }
}

impl InitialConditions {
    pub fn validate(&self) -> Result<()> {
        if [self.x, self.z, self.vx, self.vz].iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(SimError::InvalidConfig(format!("non-finite initial conditions: {:?}", self)))
        }
    }
}

// ---------------------------------------------------------------------------
// Vehicle builder
// ---------------------------------------------------------------------------

pub struct VehicleParamsBuilder {
    params: VehicleParams,
}

impl VehicleParamsBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            params: VehicleParams { name: name.into(), ..VehicleParams::default() },
        }
    }

    pub fn dry_mass(mut self, v: f64) -> Self { self.params.dry_mass = v; self }
    pub fn wet_mass(mut self, v: f64) -> Self { self.params.wet_mass = v; self }
    pub fn isp(mut self, v: f64) -> Self { self.params.isp = v; self }
    pub fn thrusters(mut self, n: u32) -> Self { self.params.thrusters = n; self }
    pub fn throttle_bounds(mut self, min: f64, max: f64) -> Self {
        self.params.throttle_min = min;
        self.params.throttle_max = max;
        self
    }
    pub fn thruster_rating(mut self, v: f64) -> Self { self.params.thruster_rating = v; self }
    pub fn cant_angle(mut self, deg: f64) -> Self { self.params.cant_angle = deg; self }
    pub fn gravity(mut self, v: f64) -> Self { self.params.gravity = v; self }

    pub fn build(self) -> VehicleParams {
        self.params
    }
}

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Skycrane-class descent stage on Mars.
    pub fn mars_lander() -> VehicleParams {
        VehicleParams::default()
    }

    /// Same propulsion bay with a lighter airframe under lunar gravity.
    pub fn lunar_hopper() -> VehicleParams {
        VehicleParamsBuilder::new("Lunar Hopper")
            .dry_mass(900.0)
            .wet_mass(1300.0)
            .gravity(1.62)
            .build()
    }
}

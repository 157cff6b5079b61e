use nalgebra::Vector2;

use crate::dynamics::state::EARTH_GRAVITY;
use super::params::VehicleParams;

// ---------------------------------------------------------------------------
// Commanded input: direction + throttle (already clamped by the caller)
// ---------------------------------------------------------------------------

/// Pilot command for one control tick.
///
/// `direction` has norm <= 1; the zero vector means "no command" and selects
/// the hover-compensation default. `throttle` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustCommand {
    pub direction: Vector2<f64>,
    pub throttle: f64,
}

impl ThrustCommand {
    pub fn new(dx: f64, dz: f64, throttle: f64) -> Self {
        Self { direction: Vector2::new(dx, dz), throttle }
    }

    /// No stick input.
    pub fn idle() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn is_idle(&self) -> bool {
        self.direction.x == 0.0 && self.direction.y == 0.0
    }
}

impl Default for ThrustCommand {
    fn default() -> Self {
        Self::idle()
    }
}

// ---------------------------------------------------------------------------
// Thrust output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thrust {
    pub force: Vector2<f64>,   // N [tx, tz]
    pub magnitude: f64,        // N, drives propellant flow
}

impl Thrust {
    pub fn zero() -> Self {
        Self { force: Vector2::zeros(), magnitude: 0.0 }
    }
}

// ---------------------------------------------------------------------------
// Thrust model: constants derived once per session from the vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ThrustModel {
    pub cos_phi: f64,
    /// Propellant flow per newton of thrust, kg/(N s).
    pub alpha: f64,
    /// Total thrust at zero throttle (rho_1), N.
    pub min_thrust: f64,
    /// Total thrust at full throttle (rho_2), N.
    pub max_thrust: f64,
    /// Thrust at 100% rating on every thruster, N.
    pub rated_thrust: f64,
    pub gravity: f64,
}

impl ThrustModel {
    pub fn new(vehicle: &VehicleParams) -> Self {
        let cos_phi = vehicle.cant_angle.to_radians().cos();
        let rated_thrust = vehicle.thrusters as f64 * vehicle.thruster_rating * cos_phi;
        Self {
            cos_phi,
            alpha: 1.0 / (vehicle.isp * EARTH_GRAVITY * cos_phi),
            min_thrust: rated_thrust * vehicle.throttle_min,
            max_thrust: rated_thrust * vehicle.throttle_max,
            rated_thrust,
            gravity: vehicle.gravity,
        }
    }

    /// Thrust for a command at the given vehicle mass.
    ///
    /// A zero direction yields vertical hover thrust `gravity * mass`.
    /// Otherwise the magnitude interpolates linearly between the bounds and
    /// the direction is used as given (no re-normalisation).
    pub fn compute(&self, cmd: &ThrustCommand, mass: f64) -> Thrust {
        if cmd.is_idle() {
            let hover = self.gravity * mass;
            return Thrust {
                force: Vector2::new(0.0, hover),
                magnitude: hover,
            };
        }
        let magnitude = self.min_thrust + (self.max_thrust - self.min_thrust) * cmd.throttle;
        Thrust {
            force: cmd.direction * magnitude,
            magnitude,
        }
    }

    /// Thrust magnitude as a percentage of rated thrust.
    pub fn throttle_level(&self, thrust: &Thrust) -> f64 {
        thrust.magnitude / self.rated_thrust * 100.0
    }

    /// Propellant flow for a thrust magnitude, kg/s (positive).
    pub fn mass_flow(&self, thrust: &Thrust) -> f64 {
        self.alpha * thrust.magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::MARS_GRAVITY;

    fn model() -> ThrustModel {
        ThrustModel::new(&VehicleParams::default())
    }

    #[test]
    fn derived_constants_match_reference_vehicle() {
        let m = model();
        let cos_phi = 27.0_f64.to_radians().cos();
        assert!((m.cos_phi - cos_phi).abs() < 1e-12);
        assert!((m.min_thrust - 6.0 * 0.3 * 3100.0 * cos_phi).abs() < 1e-9);
        assert!((m.max_thrust - 6.0 * 0.8 * 3100.0 * cos_phi).abs() < 1e-9);
        assert!((m.alpha - 1.0 / (225.0 * 9.807 * cos_phi)).abs() < 1e-15);
    }

    #[test]
    fn idle_command_holds_hover() {
        let t = model().compute(&ThrustCommand::new(0.0, 0.0, 0.7), 1905.0);
        assert_eq!(t.force.x, 0.0);
        assert!((t.force.y - MARS_GRAVITY * 1905.0).abs() < 1e-9);
        assert!((t.force.y - 7070.217).abs() < 1e-3);
        assert_eq!(t.magnitude, t.force.y);
    }

    #[test]
    fn throttle_interpolates_between_bounds() {
        let m = model();
        let low = m.compute(&ThrustCommand::new(0.0, 1.0, 0.0), 1800.0);
        let high = m.compute(&ThrustCommand::new(0.0, 1.0, 1.0), 1800.0);
        let mid = m.compute(&ThrustCommand::new(0.0, 1.0, 0.5), 1800.0);
        assert!((low.magnitude - m.min_thrust).abs() < 1e-9);
        assert!((high.magnitude - m.max_thrust).abs() < 1e-9);
        assert!((mid.magnitude - 0.5 * (m.min_thrust + m.max_thrust)).abs() < 1e-9);
    }

    #[test]
    fn direction_is_not_renormalised() {
        let m = model();
        let t = m.compute(&ThrustCommand::new(0.3, 0.4, 1.0), 1800.0);
        assert!((t.force.x - 0.3 * m.max_thrust).abs() < 1e-9);
        assert!((t.force.y - 0.4 * m.max_thrust).abs() < 1e-9);
        assert!((t.magnitude - m.max_thrust).abs() < 1e-9);
    }

    #[test]
    fn full_throttle_level_is_max_fraction() {
        let m = model();
        let t = m.compute(&ThrustCommand::new(1.0, 0.0, 1.0), 1800.0);
        assert!((m.throttle_level(&t) - 80.0).abs() < 1e-9);
    }
}

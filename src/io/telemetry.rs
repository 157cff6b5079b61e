use std::fmt;

use crate::dynamics::state::State;
use crate::vehicle::{Lander, Thrust};

/// Diagnostic dump of the current state and thrust.
#[derive(Debug, Clone, Copy)]
pub struct Telemetry {
    pub state: State,
    pub thrust: Thrust,
    pub dry_mass: f64,
    /// Percent of rated thrust.
    pub throttle_level: f64,
}

impl Telemetry {
    pub fn new(state: State, thrust: Thrust, lander: &Lander) -> Self {
        Self {
            state,
            thrust,
            dry_mass: lander.dry_mass(),
            throttle_level: lander.engine.throttle_level(&thrust),
        }
    }

    pub fn propellant(&self) -> f64 {
        (self.state.mass - self.dry_mass).max(0.0)
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.state;
        writeln!(f, "Current state (t={:.2}s)", s.time)?;
        writeln!(f, "{{")?;
        writeln!(f, "  X = {:.2} m", s.pos.x)?;
        writeln!(f, "  Z = {:.2} m", s.pos.y)?;
        writeln!(f, "  VX = {:.2} m/s", s.vel.x)?;
        writeln!(f, "  VZ = {:.2} m/s", s.vel.y)?;
        writeln!(f, "  M = {:.2} kg (DRY @ {:.2})", s.mass, self.dry_mass)?;
        writeln!(f, "  TX = {:.2} N", self.thrust.force.x)?;
        writeln!(f, "  TZ = {:.2} N", self.thrust.force.y)?;
        writeln!(f, "  |T| = {:.2} N ({:.0}%)", self.thrust.magnitude, self.throttle_level)?;
        write!(f, "}}")
    }
}

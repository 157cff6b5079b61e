use nalgebra::Vector2;

use crate::dynamics::state::{Deriv, State};
use crate::vehicle::{Lander, Thrust};

// ---------------------------------------------------------------------------
// Equations of motion (planar point mass, constant gravity)
// ---------------------------------------------------------------------------

/// Which branch of the equations of motion applies to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Propellant left and above ground: thrust, gravity and mass flow.
    Powered,
    /// Propellant exhausted, above ground: ballistic fall.
    Ballistic,
    /// At or below ground: no forces, no mass flow.
    Grounded,
}

impl Regime {
    pub fn of(state: &State, dry_mass: f64) -> Regime {
        if state.pos.y <= 0.0 {
            Regime::Grounded
        } else if state.mass > dry_mass {
            Regime::Powered
        } else {
            Regime::Ballistic
        }
    }
}

/// Compute state derivatives under the given (frozen) thrust.
///
/// Position derivatives are always the velocity, including on the ground:
/// a grounded state keeps drifting at its impact velocity if integrated.
pub fn derivatives(state: &State, lander: &Lander, thrust: &Thrust) -> Deriv {
    let g = lander.gravity();

    let (dvel, dmass) = match Regime::of(state, lander.dry_mass()) {
        Regime::Powered => (
            Vector2::new(0.0, -g) + thrust.force / state.mass,
            -lander.engine.mass_flow(thrust),
        ),
        Regime::Ballistic => (Vector2::new(0.0, -g), 0.0),
        Regime::Grounded => (Vector2::zeros(), 0.0),
    };

    Deriv {
        dpos: state.vel,
        dvel,
        dmass,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{presets, ThrustCommand};

    fn lander() -> Lander {
        Lander::new(presets::mars_lander()).unwrap()
    }

    fn state(z: f64, mass: f64) -> State {
        State::new(0.0, Vector2::new(0.0, z), Vector2::new(12.0, -30.0), mass)
    }

    #[test]
    fn hover_thrust_cancels_gravity() {
        let l = lander();
        let s = state(1000.0, 1905.0);
        let t = l.thrust(&ThrustCommand::idle(), s.mass);
        let d = derivatives(&s, &l, &t);
        assert!(d.dvel.x.abs() < 1e-12);
        assert!(d.dvel.y.abs() < 1e-12, "hover should give zero vertical accel, got {}", d.dvel.y);
        assert!(d.dmass < 0.0);
    }

    #[test]
    fn powered_flow_is_alpha_times_magnitude() {
        let l = lander();
        let s = state(1000.0, 1800.0);
        let t = l.thrust(&ThrustCommand::new(0.6, 0.8, 1.0), s.mass);
        let d = derivatives(&s, &l, &t);
        assert!((d.dmass + l.engine.alpha * t.magnitude).abs() < 1e-12);
        assert_eq!(d.dmass, -l.engine.mass_flow(&t));
        assert!((d.dvel.x - t.force.x / 1800.0).abs() < 1e-12);
        assert!((d.dvel.y - (t.force.y / 1800.0 - l.gravity())).abs() < 1e-12);
        assert_eq!(d.dpos, s.vel);
    }

    #[test]
    fn dry_vehicle_falls_ballistically() {
        let l = lander();
        let s = state(100.0, l.dry_mass());
        let t = l.thrust(&ThrustCommand::new(0.0, 1.0, 1.0), s.mass);
        let d = derivatives(&s, &l, &t);
        assert_eq!(Regime::of(&s, l.dry_mass()), Regime::Ballistic);
        assert_eq!(d.dvel.x, 0.0);
        assert!((d.dvel.y + l.gravity()).abs() < 1e-12);
        assert_eq!(d.dmass, 0.0);
    }

    #[test]
    fn grounded_state_keeps_only_position_rates() {
        let l = lander();
        for mass in [1905.0, 1505.0] {
            let s = state(0.0, mass);
            let t = l.thrust(&ThrustCommand::new(0.0, 1.0, 1.0), s.mass);
            let d = derivatives(&s, &l, &t);
            assert_eq!(d.dvel, Vector2::zeros());
            assert_eq!(d.dmass, 0.0);
            assert_eq!(d.dpos, s.vel);
        }
    }
}

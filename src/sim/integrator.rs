use crate::dynamics;
use crate::dynamics::state::{Deriv, State};
use crate::vehicle::{Lander, Thrust};

// ---------------------------------------------------------------------------
// Explicit (forward) Euler, first order
// ---------------------------------------------------------------------------

/// Single Euler step with an arbitrary derivative function.
pub fn euler_step_with<F>(state: &State, dt: f64, f: F) -> State
where
    F: Fn(&State) -> Deriv,
{
    state.apply(&f(state), dt)
}

/// Single Euler step of the lander dynamics with thrust constant over the step.
pub fn euler_step(state: &State, lander: &Lander, thrust: &Thrust, dt: f64) -> State {
    euler_step_with(state, dt, |s| dynamics::derivatives(s, lander, thrust))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{presets, ThrustCommand};
    use nalgebra::Vector2;

    #[test]
    fn free_fall_after_dry_out() {
        let l = Lander::new(presets::mars_lander()).unwrap();
        let s = State::new(3.0, Vector2::new(50.0, 100.0), Vector2::new(4.0, -10.0), l.dry_mass());
        let t = l.thrust(&ThrustCommand::new(0.0, 1.0, 1.0), s.mass);
        let n = euler_step(&s, &l, &t, 0.01);
        assert!((n.vel.y - (-10.0 - l.gravity() * 0.01)).abs() < 1e-12);
        assert!((s.vel.y - n.vel.y - 0.037114).abs() < 1e-9);
        assert_eq!(n.mass, s.mass);
        assert_eq!(n.vel.x, s.vel.x);
        assert!((n.time - 3.01).abs() < 1e-12);
    }

    #[test]
    fn position_uses_start_of_step_velocity() {
        let s = State::new(0.0, Vector2::new(0.0, 10.0), Vector2::new(1.0, 2.0), 5.0);
        let n = euler_step_with(&s, 0.5, |st| Deriv {
            dpos: st.vel,
            dvel: Vector2::new(100.0, 100.0),
            dmass: 0.0,
        });
        assert!((n.pos.x - 0.5).abs() < 1e-12);
        assert!((n.pos.y - 11.0).abs() < 1e-12);
        assert!((n.vel.x - 51.0).abs() < 1e-12);
    }
}

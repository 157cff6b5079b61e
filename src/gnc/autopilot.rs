use nalgebra::Vector2;

use crate::dynamics::state::State;
use crate::vehicle::{Lander, ThrustCommand};
use super::controller::Controller;
use super::pid::Pid;

// ---------------------------------------------------------------------------
// Descent autopilot: descent-rate profile + lateral damping
// ---------------------------------------------------------------------------

/// Closed-loop pilot for a powered descent.
///
/// Vertical: track `v_ref(z) = -max(touchdown_speed, sqrt(2 * brake_accel * z))`
/// with a PID on vertical speed. Lateral: damp horizontal velocity with
/// whatever thrust is left after the vertical demand.
#[derive(Debug, Clone)]
pub struct DescentAutopilot {
    pub brake_accel: f64,      // m/s^2, constant deceleration of the profile
    pub touchdown_speed: f64,  // m/s, floor of the profile near the ground
    pub lateral_gain: f64,     // 1/s
    pub vertical: Pid,
}

impl DescentAutopilot {
    pub fn new() -> Self {
        Self {
            brake_accel: 1.5,
            touchdown_speed: 2.0,
            lateral_gain: 0.5,
            vertical: Pid::new(2.0, 0.05, 0.0),
        }
    }

    /// Target vertical speed at an altitude (negative = descending).
    pub fn reference_rate(&self, altitude: f64) -> f64 {
        let profile = (2.0 * self.brake_accel * altitude.max(0.0)).sqrt();
        -profile.max(self.touchdown_speed)
    }

    pub fn update(&mut self, state: &State, lander: &Lander, dt: f64) -> ThrustCommand {
        let engine = &lander.engine;
        let mass = state.mass;

        let rate_error = self.reference_rate(state.pos.y) - state.vel.y;
        let accel_z = lander.gravity() + self.vertical.update(rate_error, dt);

        // Vertical demand first, lateral gets the remaining budget.
        let fz = (mass * accel_z).clamp(0.0, engine.max_thrust);
        let fx_budget = (engine.max_thrust.powi(2) - fz.powi(2)).max(0.0).sqrt();
        let fx = (-self.lateral_gain * state.vel.x * mass).clamp(-fx_budget, fx_budget);

        let force = Vector2::new(fx, fz);
        let magnitude = force.norm();
        if magnitude <= f64::EPSILON {
            // Lowest thrust, pointing up.
            return ThrustCommand::new(0.0, 1.0, 0.0);
        }

        let span = engine.max_thrust - engine.min_thrust;
        let throttle = if span > 0.0 {
            ((magnitude - engine.min_thrust) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let direction = force / magnitude;
        ThrustCommand { direction, throttle }
    }
}

impl Default for DescentAutopilot {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for DescentAutopilot {
    fn command(&mut self, state: &State, lander: &Lander, dt: f64) -> ThrustCommand {
        self.update(state, lander, dt)
    }

    fn reset(&mut self) {
        self.vertical.reset();
    }

    fn name(&self) -> &str {
        "DescentAutopilot"
    }
}

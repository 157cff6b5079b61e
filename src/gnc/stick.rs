use crate::dynamics::state::State;
use crate::vehicle::{Lander, ThrustCommand};
use super::controller::Controller;

/// Full-scale deflection of a gamepad axis.
pub const MAX_AXIS_VALUE: i16 = i16::MAX;

// ---------------------------------------------------------------------------
// Gamepad stick + trigger normalisation
// ---------------------------------------------------------------------------

/// Latest stick direction and trigger throttle, already normalised.
///
/// Each axis update saturates the new component to [-1, 1] and rescales
/// the (x, z) pair to unit length unless both are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickInput {
    x: f64,
    z: f64,
    throttle: f64,
}

impl StickInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Left stick, left/right.
    pub fn set_horizontal_axis(&mut self, raw: i16) {
        self.x = axis_fraction(raw).clamp(-1.0, 1.0);
        self.normalize();
    }

    /// Left stick, up/down. Pushing up commands positive (upward) thrust.
    pub fn set_vertical_axis(&mut self, raw: i16) {
        self.z = (-axis_fraction(raw)).clamp(-1.0, 1.0);
        self.normalize();
    }

    /// Right trigger: released = 0, fully pressed = 1.
    pub fn set_trigger(&mut self, raw: i16) {
        let max = MAX_AXIS_VALUE as f64;
        self.throttle = ((raw as f64 + max) / (2.0 * max)).clamp(0.0, 1.0);
    }

    pub fn command(&self) -> ThrustCommand {
        ThrustCommand::new(self.x, self.z, self.throttle)
    }

    fn normalize(&mut self) {
        let norm = self.x.hypot(self.z);
        if norm == 0.0 {
            return;
        }
        self.x /= norm;
        self.z /= norm;
    }
}

fn axis_fraction(raw: i16) -> f64 {
    raw as f64 / MAX_AXIS_VALUE as f64
}

impl Controller for StickInput {
    fn command(&mut self, _state: &State, _lander: &Lander, _dt: f64) -> ThrustCommand {
        StickInput::command(self)
    }

    fn name(&self) -> &str {
        "StickInput"
    }
}

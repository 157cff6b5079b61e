use crate::dynamics::state::State;
use crate::vehicle::{Lander, ThrustCommand};

/// Trait for pilots: anything that produces a thrust command each control tick.
///
/// Implement this to fly the lander from a script, a stick or a guidance law.
pub trait Controller {
    /// Compute the command from the latest state.
    fn command(&mut self, state: &State, lander: &Lander, dt: f64) -> ThrustCommand;

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Never touches the stick: the thrust model holds hover thrust.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverHold;

impl Controller for HoverHold {
    fn command(&mut self, _state: &State, _lander: &Lander, _dt: f64) -> ThrustCommand {
        ThrustCommand::idle()
    }

    fn name(&self) -> &str {
        "HoverHold"
    }
}

use crate::dynamics::state::State;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Altitude reached or crossed zero. Terminal for the session.
    Grounded,
    /// Mass reached or crossed dry mass.
    Dry,
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind>;

    /// Whether the detector has fired since construction or the last reset.
    fn fired(&self) -> bool;

    fn reset(&mut self);
}

/// Ground contact: fires once on the first state with altitude <= 0.
#[derive(Debug, Clone, Default)]
pub struct GroundContactDetector {
    fired: bool,
}

impl GroundContactDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector already latched if the session starts on the ground.
    pub fn starting_at(state: &State) -> Self {
        Self { fired: state.pos.y <= 0.0 }
    }
}

impl EventDetector for GroundContactDetector {
    fn check(&mut self, _prev: &State, current: &State) -> Option<EventKind> {
        if self.fired || current.pos.y > 0.0 {
            return None;
        }
        self.fired = true;
        Some(EventKind::Grounded)
    }

    fn fired(&self) -> bool {
        self.fired
    }

    fn reset(&mut self) {
        self.fired = false;
    }
}

/// Propellant depletion: fires once on the first state with mass <= dry mass.
#[derive(Debug, Clone)]
pub struct PropellantDepletionDetector {
    pub dry_mass: f64,
    fired: bool,
}

impl PropellantDepletionDetector {
    pub fn new(dry_mass: f64) -> Self {
        Self { dry_mass, fired: false }
    }

    pub fn starting_at(state: &State, dry_mass: f64) -> Self {
        Self { dry_mass, fired: state.mass <= dry_mass }
    }
}

impl EventDetector for PropellantDepletionDetector {
    fn check(&mut self, _prev: &State, current: &State) -> Option<EventKind> {
        if self.fired || current.mass > self.dry_mass {
            return None;
        }
        self.fired = true;
        Some(EventKind::Dry)
    }

    fn fired(&self) -> bool {
        self.fired
    }

    fn reset(&mut self) {
        self.fired = false;
    }
}

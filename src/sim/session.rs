use tracing::{debug, info, warn};

use crate::config::LanderConfig;
use crate::dynamics::state::State;
use crate::error::Result;
use crate::io::telemetry::Telemetry;
use crate::vehicle::{Lander, Thrust, ThrustCommand};
use super::event::{
    EventDetector, EventKind, GroundContactDetector, PropellantDepletionDetector, SimEvent,
};
use super::history::StateHistory;
use super::integrator::euler_step;
use super::predictor::{self, Forecast};

/// Remainders below this fraction of a sub-step are float noise, not a step.
const REMAINDER_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    /// Grounded; only `reset` leaves this phase.
    Terminated,
}

/// Outcome of one `advance` call.
#[derive(Debug, Clone, Default)]
pub struct AdvanceReport {
    /// Sub-steps integrated and appended to the history.
    pub steps: usize,
    /// Events raised during this call, in order.
    pub events: Vec<SimEvent>,
    /// Elapsed time was cut short by `max_substeps_per_advance`.
    pub truncated: bool,
}

impl AdvanceReport {
    pub fn grounded(&self) -> bool {
        self.events.iter().any(|e| e.kind == EventKind::Grounded)
    }
}

/// Split a duration into whole sub-steps plus a final partial step.
pub fn decompose(duration: f64, dt: f64) -> (usize, f64) {
    let ratio = duration / dt;
    let mut full = ratio.floor();
    if ratio - full > 1.0 - REMAINDER_TOLERANCE {
        full += 1.0;
    }
    let rem = duration - full * dt;
    let rem = if rem > dt * REMAINDER_TOLERANCE { rem } else { 0.0 };
    (full as usize, rem)
}

// ---------------------------------------------------------------------------
// Session driver: sole owner and writer of the history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Session {
    config: LanderConfig,
    lander: Lander,
    history: StateHistory,
    command: ThrustCommand,
    thrust: Thrust,
    ground: GroundContactDetector,
    depletion: PropellantDepletionDetector,
    phase: Phase,
    prediction: bool,
    /// Elapsed time too short to step yet; folded into the next `advance`.
    pending: f64,
}

impl Session {
    /// Build a session at the configured initial state. Fails without
    /// starting if the configuration is invalid or storage cannot be reserved.
    pub fn new(config: LanderConfig) -> Result<Self> {
        config.validate()?;
        let lander = Lander::new(config.vehicle.clone())?;
        let start = config.initial_state();
        let history = StateHistory::new(start, config.sim.history_retention)?;

        let command = ThrustCommand::idle();
        let thrust = lander.thrust(&command, start.mass);
        let ground = GroundContactDetector::starting_at(&start);
        let depletion = PropellantDepletionDetector::starting_at(&start, lander.dry_mass());
        let phase = if ground.fired() { Phase::Terminated } else { Phase::Running };

        debug!(vehicle = %lander.params.name, ?phase, "session created");

        Ok(Self {
            config,
            lander,
            history,
            command,
            thrust,
            ground,
            depletion,
            phase,
            prediction: true,
            pending: 0.0,
        })
    }

    /// Discard history and flags and restart from the initial state.
    /// The last pilot command and prediction toggle carry over.
    pub fn reset(&mut self) -> Result<()> {
        let mut fresh = Session::new(self.config.clone())?;
        fresh.command = self.command;
        fresh.prediction = self.prediction;
        if let Some(head) = fresh.history.head() {
            fresh.thrust = fresh.lander.thrust(&fresh.command, head.mass);
        }
        *self = fresh;
        info!("session reset");
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            debug!("paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            debug!("resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Terminated => {}
        }
    }

    /// Control tick: store the pilot command and refresh the cached thrust
    /// from the latest mass. Ignored once grounded; returns whether accepted.
    pub fn set_command(&mut self, command: ThrustCommand) -> bool {
        if self.ground.fired() {
            return false;
        }
        self.command = command;
        self.refresh_thrust();
        true
    }

    fn refresh_thrust(&mut self) {
        if let Some(head) = self.history.head() {
            self.thrust = self.lander.thrust(&self.command, head.mass);
        }
    }

    /// Integrate `elapsed` seconds of simulated time in fixed sub-steps.
    ///
    /// No-op when not running, when grounded, or when `elapsed` is not a
    /// positive finite number. Thrust is recomputed once and held for every
    /// sub-step of the call. Stepping stops at the first grounded state.
    /// A leftover below the step tolerance is carried into the next call.
    pub fn advance(&mut self, elapsed: f64) -> Result<AdvanceReport> {
        let mut report = AdvanceReport::default();
        if self.phase != Phase::Running || self.ground.fired() {
            return Ok(report);
        }
        if !(elapsed.is_finite() && elapsed > 0.0) {
            return Ok(report);
        }
        let Some(&head) = self.history.head() else {
            return Ok(report);
        };

        self.refresh_thrust();

        let dt = self.config.sim.dt;
        let total = elapsed + self.pending;
        let (full, rem) = decompose(total, dt);
        self.pending = if rem > 0.0 { 0.0 } else { total - full as f64 * dt };
        if full == 0 && rem == 0.0 {
            return Ok(report);
        }
        let planned = full.saturating_add(usize::from(rem > 0.0));
        let budget = self.config.sim.max_substeps_per_advance;
        if planned > budget {
            warn!(
                elapsed,
                planned,
                budget,
                "advance exceeds sub-step budget, dropping the excess"
            );
            report.truncated = true;
            self.pending = 0.0;
        }
        let count = planned.min(budget);
        self.history.reserve(count)?;

        let mut prev = head;
        for i in 0..count {
            let step = if i < full { dt } else { rem };
            let next = euler_step(&prev, &self.lander, &self.thrust, step);
            self.history.push(next)?;
            report.steps += 1;

            let raised = [self.ground.check(&prev, &next), self.depletion.check(&prev, &next)];
            for kind in raised.into_iter().flatten() {
                match kind {
                    EventKind::Grounded => info!(
                        t = next.time,
                        vx = next.vel.x,
                        vz = next.vel.y,
                        mass = next.mass,
                        "ground contact"
                    ),
                    EventKind::Dry => info!(t = next.time, z = next.pos.y, "propellant exhausted"),
                }
                report.events.push(SimEvent { time: next.time, kind, state: next });
            }

            prev = next;
            if self.ground.fired() {
                self.phase = Phase::Terminated;
                self.pending = 0.0;
                break;
            }
        }

        let pruned = self.history.prune();
        debug!(steps = report.steps, pruned, t = prev.time, "advanced");
        Ok(report)
    }

    /// Forecast from the head with the current thrust frozen.
    pub fn predict(&self) -> Result<Forecast> {
        predictor::predict(self.history.head(), &self.lander, &self.thrust, &self.config.sim)
    }

    /// Forecast if prediction display is enabled.
    pub fn forecast(&self) -> Result<Option<Forecast>> {
        if !self.prediction {
            return Ok(None);
        }
        self.predict().map(Some)
    }

    pub fn set_prediction(&mut self, enabled: bool) {
        self.prediction = enabled;
    }

    pub fn toggle_prediction(&mut self) {
        self.prediction = !self.prediction;
    }

    pub fn prediction_enabled(&self) -> bool {
        self.prediction
    }

    pub fn telemetry(&self) -> Option<Telemetry> {
        self.history
            .head()
            .map(|s| Telemetry::new(*s, self.thrust, &self.lander))
    }

    pub fn config(&self) -> &LanderConfig {
        &self.config
    }

    pub fn lander(&self) -> &Lander {
        &self.lander
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn head(&self) -> Option<&State> {
        self.history.head()
    }

    pub fn command(&self) -> ThrustCommand {
        self.command
    }

    pub fn thrust(&self) -> Thrust {
        self.thrust
    }

    /// Simulated time owed to the next `advance`.
    pub fn pending_time(&self) -> f64 {
        self.pending
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_dry(&self) -> bool {
        self.depletion.fired()
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.fired()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

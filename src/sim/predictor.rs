use crate::dynamics::state::{SimConfig, State};
use crate::error::Result;
use crate::vehicle::{Lander, Thrust};
use super::integrator::euler_step;

// ---------------------------------------------------------------------------
// Trajectory forecast
// ---------------------------------------------------------------------------

/// Disposable projection of future states, oldest first.
///
/// The first entry is a copy of the starting state; the last one may sit
/// past a floor (altitude below zero or mass at/below dry mass).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    pub states: Vec<State>,
    /// Stopped by `max_forecast_steps` rather than a floor crossing.
    pub truncated: bool,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last(&self) -> Option<&State> {
        self.states.last()
    }

    /// Predicted touchdown state, if the forecast reaches the ground.
    pub fn touchdown(&self) -> Option<&State> {
        self.states.iter().find(|s| s.pos.y <= 0.0)
    }
}

/// Project the trajectory from `start` with thrust frozen at `thrust`.
///
/// Steps while altitude >= 0 and mass > dry mass. Pure: identical inputs
/// give identical forecasts. Returns an empty forecast if `start` is `None`.
pub fn predict(
    start: Option<&State>,
    lander: &Lander,
    thrust: &Thrust,
    config: &SimConfig,
) -> Result<Forecast> {
    let Some(start) = start else {
        return Ok(Forecast::default());
    };

    let dry_mass = lander.dry_mass();
    let mut states = Vec::new();
    states.try_reserve(1)?;
    states.push(*start);

    let mut state = *start;
    let mut steps = 0;
    while state.pos.y >= 0.0 && state.mass > dry_mass {
        if steps == config.max_forecast_steps {
            return Ok(Forecast { states, truncated: true });
        }
        state = euler_step(&state, lander, thrust, config.dt);
        states.try_reserve(1)?;
        states.push(state);
        steps += 1;
    }

    Ok(Forecast { states, truncated: false })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{presets, ThrustCommand};
    use nalgebra::Vector2;

    fn lander() -> Lander {
        Lander::new(presets::mars_lander()).unwrap()
    }

    fn initial(l: &Lander) -> State {
        State::new(0.0, Vector2::new(2000.0, 1500.0), Vector2::new(100.0, -75.0), l.params.wet_mass)
    }

    #[test]
    fn forecast_is_deterministic() {
        let l = lander();
        let s = initial(&l);
        let t = l.thrust(&ThrustCommand::new(0.6, 0.8, 0.4), s.mass);
        let config = SimConfig::default();
        let a = predict(Some(&s), &l, &t, &config).unwrap();
        let b = predict(Some(&s), &l, &t, &config).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a, b);
    }

    #[test]
    fn hover_forecast_ends_on_ground() {
        let l = lander();
        let s = initial(&l);
        let t = l.thrust(&ThrustCommand::idle(), s.mass);
        let f = predict(Some(&s), &l, &t, &SimConfig::default()).unwrap();
        assert!(!f.truncated);
        assert_eq!(f.states[0], s);
        let last = f.last().unwrap();
        assert!(last.pos.y < 0.0);
        // Everything before the last step is still airborne.
        assert!(f.states[..f.len() - 1].iter().all(|st| st.pos.y >= 0.0));
        // Frozen hover thrust slightly outgrows the lightening vehicle, so
        // touchdown comes a little after 1500 m / 75 m/s.
        assert!(last.time > 20.0 && last.time < 21.0, "touchdown at {}", last.time);
        assert!(f.touchdown().is_some());
    }

    #[test]
    fn timestamps_step_by_dt() {
        let l = lander();
        let s = initial(&l);
        let t = l.thrust(&ThrustCommand::idle(), s.mass);
        let f = predict(Some(&s), &l, &t, &SimConfig::default()).unwrap();
        for w in f.states.windows(2) {
            assert!((w[1].time - w[0].time - 0.01).abs() < 1e-9);
        }
    }

    #[test]
    fn forecast_stops_when_dry() {
        let l = lander();
        let s = State::new(0.0, Vector2::new(0.0, 50_000.0), Vector2::zeros(), l.dry_mass() + 1.0);
        let t = l.thrust(&ThrustCommand::new(0.0, 1.0, 1.0), s.mass);
        let f = predict(Some(&s), &l, &t, &SimConfig::default()).unwrap();
        assert!(f.last().unwrap().mass <= l.dry_mass());
        assert!(f.states[..f.len() - 1].iter().all(|st| st.mass > l.dry_mass()));
    }

    #[test]
    fn missing_start_gives_empty_forecast() {
        let l = lander();
        let f = predict(None, &l, &Thrust::zero(), &SimConfig::default()).unwrap();
        assert!(f.is_empty());
    }

    #[test]
    fn dry_start_yields_only_the_start() {
        let l = lander();
        let s = State::new(0.0, Vector2::new(0.0, 300.0), Vector2::zeros(), l.dry_mass());
        let f = predict(Some(&s), &l, &Thrust::zero(), &SimConfig::default()).unwrap();
        assert_eq!(f.states, vec![s]);
    }

    #[test]
    fn resting_on_the_pad_is_time_boxed() {
        let l = lander();
        let s = State::new(0.0, Vector2::new(0.0, 0.0), Vector2::zeros(), 1800.0);
        let config = SimConfig { max_forecast_steps: 250, ..SimConfig::default() };
        let f = predict(Some(&s), &l, &Thrust::zero(), &config).unwrap();
        assert!(f.truncated);
        assert_eq!(f.len(), 251);
    }
}

pub mod lander;
pub mod state;

pub use lander::{derivatives, Regime};
pub use state::{Deriv, SimConfig, State, EARTH_GRAVITY, FORWARD_TIME_STEP, MARS_GRAVITY};

pub mod config;
pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod io;
pub mod sim;
pub mod vehicle;

pub use config::LanderConfig;
pub use error::{Result, SimError};

pub mod types {
    pub use crate::dynamics::state::{Deriv, SimConfig, State, EARTH_GRAVITY, FORWARD_TIME_STEP, MARS_GRAVITY};
    pub use crate::vehicle::{InitialConditions, Lander, Thrust, ThrustCommand, ThrustModel, VehicleParams};
}

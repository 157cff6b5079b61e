use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Errors surfaced by session setup, storage growth and exports.
///
/// Floor crossings (ground contact, propellant depletion) are not errors;
/// they are reported as [`crate::sim::event::SimEvent`]s.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid vehicle parameters: {0}")]
    InvalidVehicle(String),

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("failed to grow state storage: {0}")]
    Allocation(#[from] TryReserveError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

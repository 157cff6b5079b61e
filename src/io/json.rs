use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::dynamics::state::State;
use crate::error::Result;
use crate::vehicle::VehicleParams;

/// Summary statistics computed from a flight history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub vehicle: String,
    pub flight_time_s: f64,
    pub max_altitude_m: f64,
    pub downrange_m: f64,
    pub propellant_used_kg: f64,
    pub propellant_left_kg: f64,
    pub final_vx_ms: f64,
    pub final_vz_ms: f64,
    pub final_speed_ms: f64,
    pub grounded: bool,
    pub dry: bool,
}

impl FlightSummary {
    /// Compute summary from states in time order. `None` for an empty slice.
    pub fn from_states(vehicle: &VehicleParams, states: &[State]) -> Option<Self> {
        let first = states.first()?;
        let last = states.last()?;
        let max_altitude_m = states
            .iter()
            .map(State::altitude)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(FlightSummary {
            vehicle: vehicle.name.clone(),
            flight_time_s: last.time - first.time,
            max_altitude_m,
            downrange_m: last.downrange() - first.downrange(),
            propellant_used_kg: first.mass - last.mass,
            propellant_left_kg: (last.mass - vehicle.dry_mass).max(0.0),
            final_vx_ms: last.horizontal_speed(),
            final_vz_ms: last.vertical_speed(),
            final_speed_ms: last.speed(),
            grounded: last.altitude() <= 0.0,
            dry: last.mass <= vehicle.dry_mass,
        })
    }
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &FlightSummary) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

use mars_lander::gnc::{Controller, DescentAutopilot, HoverHold};
use mars_lander::io::{csv, json, FlightSummary};
use mars_lander::sim::{EventKind, Session, SimEvent};
use mars_lander::types::{State, ThrustCommand, VehicleParams};
use mars_lander::vehicle::presets;
use mars_lander::{LanderConfig, Result, SimError};

#[derive(Parser)]
#[command(name = "mars-lander")]
#[command(about = "Planetary lander descent simulator", long_about = None)]
struct Cli {
    /// Log telemetry every frame
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fly a descent with a built-in pilot
    Run {
        /// JSON configuration (vehicle, initial, sim)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Replace the configured vehicle with a preset
        #[arg(long, value_enum)]
        vehicle: Option<Vehicle>,
        #[arg(long, value_enum, default_value_t = Pilot::Autopilot)]
        pilot: Pilot,
        /// Wall-clock seconds to simulate at most
        #[arg(long, default_value_t = 180.0)]
        duration: f64,
        /// Frame length handed to each advance call
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,
        /// Write the state history to CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the flight summary to JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the forecast from the initial state under a fixed command
    Predict {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        vehicle: Option<Vehicle>,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dz: f64,
        #[arg(long, default_value_t = 0.0)]
        throttle: f64,
        /// Write the forecast to CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Pilot {
    /// No stick input: hover-compensation thrust
    Hover,
    /// Descent-rate tracking with lateral damping
    Autopilot,
}

#[derive(Clone, Copy, ValueEnum)]
enum Vehicle {
    /// Descent stage under Mars gravity
    Mars,
    /// Lighter airframe under lunar gravity
    Lunar,
}

impl Vehicle {
    fn params(self) -> VehicleParams {
        match self {
            Vehicle::Mars => presets::mars_lander(),
            Vehicle::Lunar => presets::lunar_hopper(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, vehicle, pilot, duration, frame_ms, csv, json } => {
            load_config(config.as_deref(), vehicle).and_then(|config| {
                run(config, pilot, duration, frame_ms, csv.as_deref(), json.as_deref())
            })
        }
        Commands::Predict { config, vehicle, dx, dz, throttle, csv } => {
            load_config(config.as_deref(), vehicle)
                .and_then(|config| forecast(config, dx, dz, throttle, csv.as_deref()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "aborted");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>, vehicle: Option<Vehicle>) -> Result<LanderConfig> {
    let mut config = match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            LanderConfig::from_json_file(p)?
        }
        None => LanderConfig::default(),
    };
    if let Some(v) = vehicle {
        config.vehicle = v.params();
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// run: external frame loop driving a session
// ---------------------------------------------------------------------------

fn run(
    config: LanderConfig,
    pilot: Pilot,
    duration: f64,
    frame_ms: f64,
    csv_path: Option<&Path>,
    json_path: Option<&Path>,
) -> Result<()> {
    let mut session = Session::new(config)?;
    let mut pilot: Box<dyn Controller> = match pilot {
        Pilot::Hover => Box::new(HoverHold),
        Pilot::Autopilot => Box::new(DescentAutopilot::new()),
    };

    if !(frame_ms.is_finite() && frame_ms > 0.0) {
        return Err(SimError::InvalidConfig(format!("frame length must be positive, got {frame_ms} ms")));
    }
    let frame = frame_ms / 1000.0;
    let mut events: Vec<SimEvent> = Vec::new();
    let mut clock = 0.0;

    info!(pilot = pilot.name(), frame, "descent started");
    while clock < duration && !session.is_grounded() {
        if let Some(&head) = session.head() {
            let cmd = pilot.command(&head, session.lander(), frame);
            session.set_command(cmd);
        }
        let report = session.advance(frame)?;
        events.extend(report.events);
        log_telemetry(&session);
        clock += frame;
    }

    let states = session.history().to_vec();
    let summary = FlightSummary::from_states(&session.lander().params, &states);

    print_report(&session, pilot.name(), &events, &states);

    if let Some(path) = csv_path {
        csv::write_trajectory_file(path, &states)?;
        info!(path = %path.display(), rows = states.len(), "history written");
    }
    if let (Some(path), Some(summary)) = (json_path, summary.as_ref()) {
        json::write_summary_file(path, summary)?;
        info!(path = %path.display(), "summary written");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// predict: forecast from the initial state
// ---------------------------------------------------------------------------

fn forecast(
    config: LanderConfig,
    dx: f64,
    dz: f64,
    throttle: f64,
    csv_path: Option<&Path>,
) -> Result<()> {
    let command = stick_command(dx, dz, throttle)?;
    let mut session = Session::new(config)?;
    session.set_command(command);

    let forecast = session.predict()?;
    let Some(last) = forecast.last() else {
        println!("  No forecast available.");
        return Ok(());
    };

    println!();
    println!("  Forecast ({} steps{})", forecast.len() - 1, if forecast.truncated { ", truncated" } else { "" });
    println!("  ──────────────────────────────────────────────────────────────────");
    print_table(&forecast.states);
    println!();
    let end = if forecast.truncated {
        "LIMIT"
    } else if last.altitude() < 0.0 {
        "GROUND"
    } else {
        "DRY"
    };
    println!(
        "  {:<8} t={:>6.2}s   x={:>8.1}m   vx={:>7.2}m/s   vz={:>7.2}m/s   mass={:>7.1}kg",
        end,
        last.time,
        last.downrange(),
        last.horizontal_speed(),
        last.vertical_speed(),
        last.mass
    );
    println!();

    if let Some(path) = csv_path {
        csv::write_trajectory_file(path, &forecast.states)?;
        info!(path = %path.display(), rows = forecast.len(), "forecast written");
    }
    Ok(())
}

/// Clamp and normalise like a stick would before it reaches the thrust model.
fn stick_command(dx: f64, dz: f64, throttle: f64) -> Result<ThrustCommand> {
    if !(dx.is_finite() && dz.is_finite() && throttle.is_finite()) {
        return Err(SimError::InvalidConfig(format!(
            "stick input must be finite, got dx={dx} dz={dz} throttle={throttle}"
        )));
    }
    let norm = dx.hypot(dz);
    let (dx, dz) = if norm > 0.0 { (dx / norm, dz / norm) } else { (0.0, 0.0) };
    Ok(ThrustCommand::new(dx, dz, throttle.clamp(0.0, 1.0)))
}

/// Per-frame state dump; follows the log filter, not the `--verbose` flag.
fn log_telemetry(session: &Session) -> bool {
    if !tracing::enabled!(Level::DEBUG) {
        return false;
    }
    let Some(t) = session.telemetry() else {
        return false;
    };
    debug!("\n{t}");
    true
}

// ---------------------------------------------------------------------------
// Report printing
// ---------------------------------------------------------------------------

fn print_report(session: &Session, pilot: &str, events: &[SimEvent], states: &[State]) {
    let v = &session.lander().params;
    let engine = &session.lander().engine;

    println!();
    println!("====================================================================");
    println!("  MARS LANDING — {} ({})", v.name, pilot);
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Dry mass:      {:>8.1} kg    Propellant:   {:>8.1} kg",
        v.dry_mass,
        v.propellant_mass()
    );
    println!(
        "  Min thrust:    {:>8.0} N     Max thrust:   {:>8.0} N",
        engine.min_thrust, engine.max_thrust
    );
    println!(
        "  Isp:           {:>8.0} s     Delta-v:      {:>8.0} m/s",
        v.isp,
        v.delta_v()
    );
    println!("  Gravity:       {:>8.4} m/s^2", v.gravity);
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if events.is_empty() {
        println!("  (none)");
    }
    for e in events {
        let label = match e.kind {
            EventKind::Grounded => "TOUCHDOWN",
            EventKind::Dry => "DRY",
        };
        println!(
            "  {:<9} t={:>6.2}s   alt={:>8.2}m   vx={:>7.2}m/s   vz={:>7.2}m/s",
            label,
            e.time,
            e.state.altitude(),
            e.state.horizontal_speed(),
            e.state.vertical_speed()
        );
    }
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    print_table(states);
    println!();

    if let Some(t) = session.telemetry() {
        for line in t.to_string().lines() {
            println!("  {line}");
        }
    }
    println!();
    println!("  Simulation: {} states, dt={} s", states.len(), session.config().sim.dt);
    println!("====================================================================");
    println!();
}

fn print_table(states: &[State]) {
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>8}  {:>8}  {:>8}",
        "t (s)", "x (m)", "z (m)", "vx (m/s)", "vz (m/s)", "mass(kg)"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (states.len() / 30).max(1);
    for (i, s) in states.iter().enumerate() {
        if i % sample_interval != 0 && i != states.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.1}  {:>9.1}  {:>8.2}  {:>8.2}  {:>8.2}",
            s.time,
            s.downrange(),
            s.altitude(),
            s.horizontal_speed(),
            s.vertical_speed(),
            s.mass
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_command_rejects_non_finite_input() {
        for (dx, dz, throttle) in [
            (0.0, 1.0, f64::NAN),
            (f64::NAN, 1.0, 0.5),
            (0.0, f64::INFINITY, 0.5),
        ] {
            assert!(matches!(
                stick_command(dx, dz, throttle),
                Err(SimError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn stick_command_normalises_and_clamps() {
        let cmd = stick_command(3.0, 4.0, 2.0).unwrap();
        assert!((cmd.direction.x - 0.6).abs() < 1e-12);
        assert!((cmd.direction.y - 0.8).abs() < 1e-12);
        assert_eq!(cmd.throttle, 1.0);
        assert!(stick_command(0.0, 0.0, -1.0).unwrap().is_idle());
    }

    #[test]
    fn lunar_preset_replaces_configured_vehicle() {
        let config = load_config(None, Some(Vehicle::Lunar)).unwrap();
        assert_eq!(config.vehicle, presets::lunar_hopper());
        let mut session = Session::new(config).unwrap();
        while !session.is_grounded() && session.head().unwrap().time < 60.0 {
            session.advance(0.25).unwrap();
        }
        assert!(session.is_grounded());
        assert!(!session.is_dry());
        assert!((session.lander().gravity() - 1.62).abs() < 1e-12);
    }

    #[test]
    fn telemetry_follows_log_level() {
        let session = Session::new(LanderConfig::default()).unwrap();
        let info = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_test_writer()
            .finish();
        assert!(!tracing::subscriber::with_default(info, || log_telemetry(&session)));
        let debug = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        assert!(tracing::subscriber::with_default(debug, || log_telemetry(&session)));
    }
}

//! lapline - headless runner for the lap-timing racing core.
//!
//! Runs scripted drivers around either track, probes the track oracle and compares lap times.

#![deny(clippy::unwrap_used)]

mod error;
mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lapline_shared::*;
use lapline_sim::{
    is_on_track, run_session, AutopilotDriver, Driver, FullThrottleDriver, IdleDriver,
};

use crate::error::CliError;

/// Names accepted by `--driver`.
pub(crate) const DRIVER_NAMES: [&str; 3] = ["autopilot", "idle", "full_throttle"];

#[derive(Parser)]
#[command(name = "lapline", about = "Lap-timing racing core CLI")]
#[command(version)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless session with a scripted driver
    Run {
        /// Track layout (rectangular or rounded)
        #[arg(long)]
        track: Option<TrackSelection>,

        /// Driver (autopilot, idle, full_throttle)
        #[arg(long)]
        driver: Option<String>,

        /// Maximum number of 60 Hz ticks
        #[arg(long)]
        ticks: Option<u32>,

        /// Stop after this many completed laps
        #[arg(long)]
        laps: Option<u32>,

        /// Session config JSON; flags override its fields
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output path for replay JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check whether a ground-plane point is on the road
    Probe {
        /// Track layout (rectangular or rounded)
        #[arg(long, default_value_t = TrackSelection::Rectangular)]
        track: TrackSelection,

        #[arg(allow_negative_numbers = true)]
        x: f32,

        #[arg(allow_negative_numbers = true)]
        z: f32,
    },

    /// Run the same driver on both tracks and compare lap times
    Compare {
        #[arg(long, default_value = "autopilot")]
        driver: String,

        #[arg(long, default_value_t = 2)]
        laps: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Run {
            track,
            driver,
            ticks,
            laps,
            config,
            output,
        } => {
            let mut session = match config {
                Some(path) => load_config(&path)?,
                None => SessionConfig::default(),
            };
            if let Some(track) = track {
                session.track = track;
            }
            if let Some(driver) = driver {
                session.driver = driver;
            }
            if let Some(ticks) = ticks {
                session.max_ticks = ticks;
            }
            if laps.is_some() {
                session.target_laps = laps;
            }
            cmd_run(session, output.as_deref())
        }

        Commands::Probe { track, x, z } => {
            cmd_probe(track, x, z);
            Ok(())
        }

        Commands::Compare { driver, laps } => cmd_compare(&driver, laps),
    }
}

/// Resolve a driver name to a boxed [`Driver`].
fn resolve_driver(name: &str) -> Result<Box<dyn Driver>, CliError> {
    match name {
        "autopilot" => Ok(Box::new(AutopilotDriver::new())),
        "idle" => Ok(Box::new(IdleDriver)),
        "full_throttle" => Ok(Box::new(FullThrottleDriver)),
        other => Err(CliError::UnknownDriver(other.to_string())),
    }
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    debug!(?config, "loaded session config");
    Ok(config)
}

fn cmd_run(config: SessionConfig, output: Option<&Path>) -> Result<()> {
    let mut driver = resolve_driver(&config.driver)?;

    println!(
        "Running session: {} on {} (max {} ticks)",
        driver.name(),
        config.track,
        config.max_ticks
    );

    let report = run_session(&config, driver.as_mut()).map_err(CliError::from)?;
    output::print_session(&report);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize replay")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write replay {}", path.display()))?;
        info!(path = %path.display(), "replay written");
        println!("\nReplay written to {}", path.display());
    }
    Ok(())
}

fn cmd_probe(track: TrackSelection, x: f32, z: f32) {
    let verdict = if is_on_track(x, z, track) {
        "on track"
    } else {
        "off track"
    };
    println!("({x}, {z}) on {track}: {verdict}");
}

fn cmd_compare(driver_name: &str, laps: u32) -> Result<()> {
    let mut reports = Vec::new();
    for track in TrackSelection::ALL {
        let mut driver = resolve_driver(driver_name)?;
        let config = SessionConfig {
            track,
            driver: driver.name().to_string(),
            target_laps: Some(laps),
            ..Default::default()
        };
        reports.push(run_session(&config, driver.as_mut()).map_err(CliError::from)?);
    }
    output::print_comparison(&reports);
    Ok(())
}

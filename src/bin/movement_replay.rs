//! # Movement Replay
//!
//! Runs a scripted movement scenario headless and prints the outcome as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Built-in demo course: run up, triple jump, ground pound
//! movement_replay
//!
//! # Custom scenario and tuning
//! movement_replay --scenario course.json --config tuning.json
//!
//! # Per-frame debug logging from the movement core
//! movement_replay --verbose
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};

use sky_hop_engine::player::MovementConfig;
use sky_hop_engine::replay::Scenario;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "movement_replay")]
#[command(about = "Replay a scripted platformer movement scenario")]
#[command(version)]
struct Args {
    /// Scenario file (JSON); the built-in demo runs when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Movement tuning file (JSON); unspecified values keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only the final state, not every event
    #[arg(long)]
    summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => match MovementConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!(path = %path.display(), "{err}");
                return ExitCode::FAILURE;
            }
        },
        None => MovementConfig::default(),
    };

    let scenario = match &args.scenario {
        Some(path) => match Scenario::load(path) {
            Ok(scenario) => scenario,
            Err(err) => {
                error!(path = %path.display(), "{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Scenario::demo(),
    };

    info!(
        scenario = %scenario.name,
        frames = scenario.frame_count(),
        boxes = scenario.boxes.len(),
        "running replay"
    );

    let outcome = scenario.run(config);
    for recorded in &outcome.events {
        info!(frame = recorded.frame, position = ?recorded.position, "{:?}", recorded.event);
    }

    let json = if args.summary {
        serde_json::to_string_pretty(&outcome.final_state)
    } else {
        serde_json::to_string_pretty(&outcome)
    };
    match json {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to serialize outcome: {err}");
            ExitCode::FAILURE
        }
    }
}

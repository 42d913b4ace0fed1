use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};

use clap::Args;
use fleetpath_playback::simulator::{Advance, RoutePlaybackSimulator, SimulatorConfig};
use tracing::{debug, info};

use crate::{file_utils::read_playback_input, parsers};

#[derive(Args)]
pub struct PlaybackArgs {
    /// JSON file with one route per vehicle
    #[arg(short, long)]
    routes: PathBuf,

    /// JSON cost matrix the routes were solved against
    #[arg(short, long)]
    matrix: PathBuf,

    /// Simulated time per step (e.g., "100s", "2m", "PT5M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timestep: Option<jiff::SignedDuration>,

    /// Wall-clock seconds slept per simulated second
    #[arg(short, long)]
    pace: Option<f64>,
}

/// Blocks between snapshots when pacing, so call it off the async runtime.
pub fn run(args: PlaybackArgs) -> anyhow::Result<()> {
    let (routes, matrix) = read_playback_input(&args.routes, &args.matrix)?;

    let defaults = SimulatorConfig::default();
    let config = SimulatorConfig {
        base_timestep: args
            .timestep
            .map(|timestep| timestep.as_secs_f64())
            .unwrap_or(defaults.base_timestep),
        pace_factor: args.pace.unwrap_or(defaults.pace_factor),
    };

    let mut simulator = RoutePlaybackSimulator::new(&routes, &matrix, config)?;
    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut count = 0usize;
    let mut last_elapsed = 0.0;

    while let Advance::Snapshot(snapshot) = simulator.advance() {
        debug!("Snapshot at {:.1}s", snapshot.elapsed);
        serde_json::to_writer(&mut out, &snapshot)?;
        writeln!(out)?;
        out.flush()?;
        count += 1;
        last_elapsed = snapshot.elapsed;
    }

    info!(
        "Streamed {} snapshots covering {:.1} simulated seconds",
        count, last_elapsed
    );

    Ok(())
}

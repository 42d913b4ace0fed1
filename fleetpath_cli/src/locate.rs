use std::path::PathBuf;

use clap::Args;
use fleetpath_core::Coordinate;
use fleetpath_playback::{
    simulator::{RoutePlaybackSimulator, SimulatorConfig},
    vehicle::VehicleIdx,
};
use serde::Serialize;

use crate::{file_utils::read_playback_input, parsers};

#[derive(Args)]
pub struct LocateArgs {
    #[arg(short, long)]
    routes: PathBuf,

    #[arg(short, long)]
    matrix: PathBuf,

    #[arg(short, long)]
    vehicle: usize,

    /// Time since departure (e.g., "90s", "PT1H", "3600")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    at: jiff::SignedDuration,
}

#[derive(Serialize)]
struct LocateOutput {
    vehicle: VehicleIdx,
    at: f64,
    ended: bool,
    position: Coordinate,
}

pub fn run(args: LocateArgs) -> anyhow::Result<()> {
    let (routes, matrix) = read_playback_input(&args.routes, &args.matrix)?;
    let simulator = RoutePlaybackSimulator::new(&routes, &matrix, SimulatorConfig::default())?;

    let vehicle = VehicleIdx::new(args.vehicle);
    let at = args.at.as_secs_f64();
    let located = simulator.locate(vehicle, at).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown vehicle {}, routes are given for {} vehicles",
            vehicle,
            routes.len()
        )
    })?;

    let output = LocateOutput {
        vehicle,
        at,
        ended: located.has_ended(),
        position: *located.coordinate(),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}

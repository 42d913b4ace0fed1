use std::path::PathBuf;

use clap::Args;
use fleetpath_core::Coordinate;
use fleetpath_matrix_providers::{
    cost_matrix::CostMatrix,
    cost_matrix_builder::{CostMatrixBuilder, DistanceBackendConfig},
    distance_backend::NoDistanceBackend,
    google_distance_matrix_api::{GoogleDistanceMatrixClient, GoogleDistanceMatrixClientParams},
    travel_mode::TravelMode,
};
use tracing::info;

use crate::file_utils::read_json;

#[derive(Args)]
pub struct MatrixArgs {
    /// JSON file with a list of coordinates
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// flight, geodesic, driving, walking, bicycling or transit
    #[arg(short, long, default_value = "flight")]
    mode: TravelMode,

    /// Maximum number of origins (and destinations) per backend request
    #[arg(long)]
    max_elements: Option<usize>,

    /// Maximum number of backend requests in flight
    #[arg(long)]
    max_concurrent_requests: Option<usize>,

    /// Where to write the matrix, stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let coordinates: Vec<Coordinate> = read_json(&args.input)?;

    let defaults = DistanceBackendConfig::default();
    let config = DistanceBackendConfig {
        max_elements: args.max_elements.unwrap_or(defaults.max_elements),
        max_concurrent_requests: args
            .max_concurrent_requests
            .unwrap_or(defaults.max_concurrent_requests),
    };

    let matrix: CostMatrix = if args.mode.is_analytic() {
        CostMatrixBuilder::new(NoDistanceBackend, config)
            .build(&coordinates, args.mode)
            .await?
    } else {
        let client = GoogleDistanceMatrixClient::new(GoogleDistanceMatrixClientParams::from_env()?);
        CostMatrixBuilder::new(client, config)
            .build(&coordinates, args.mode)
            .await?
    };

    let json = serde_json::to_string(&matrix)?;

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)?;
            info!(
                "Wrote {}x{} matrix to {}",
                matrix.num_nodes(),
                matrix.num_nodes(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

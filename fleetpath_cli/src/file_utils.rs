use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use fleetpath_matrix_providers::cost_matrix::CostMatrix;
use fleetpath_playback::route::Route;
use serde::de::DeserializeOwned;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn read_playback_input(routes: &Path, matrix: &Path) -> anyhow::Result<(Vec<Route>, CostMatrix)> {
    Ok((read_json(routes)?, read_json(matrix)?))
}

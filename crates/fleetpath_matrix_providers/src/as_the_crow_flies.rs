use fleetpath_core::{Coordinate, geodesy};

use crate::cost_matrix::{Cost, CostMatrix};

/// Geodesic distance matrix: every unordered pair is evaluated once and written to
/// both `[i][j]` and `[j][i]`. Fully deterministic for identical input.
pub fn as_the_crow_flies_matrix(coordinates: &[Coordinate]) -> CostMatrix {
    let num_nodes = coordinates.len();
    let mut costs: Vec<Cost> = vec![0.0; num_nodes * num_nodes];

    for (i, from) in coordinates.iter().enumerate() {
        for (j, to) in coordinates.iter().enumerate().skip(i + 1) {
            let distance = geodesy::distance(from, to);
            costs[i * num_nodes + j] = distance;
            costs[j * num_nodes + i] = distance;
        }
    }

    CostMatrix::from_flat(costs, num_nodes)
}

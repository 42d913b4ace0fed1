use fleetpath_matrix_providers::cost_matrix::CostMatrix;

use crate::route::Route;

/// Simulated seconds at which a vehicle reaches each node of its route.
///
/// `checkpoint[0] = 0` and every later entry adds `cost(leg) / velocity`, so the
/// sequence is non-decreasing for non-negative leg costs.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeCheckpoints(Vec<f64>);

impl CumulativeCheckpoints {
    pub fn new(route: &Route, matrix: &CostMatrix) -> Self {
        let mut elapsed = 0.0;
        let mut checkpoints = Vec::with_capacity(route.nodes().len());
        checkpoints.push(elapsed);

        for leg in route.nodes().windows(2) {
            elapsed += matrix.cost(leg[0], leg[1]) / route.velocity();
            checkpoints.push(elapsed);
        }

        Self(checkpoints)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Time at which the route is complete.
    pub fn last(&self) -> f64 {
        self.0.last().copied().unwrap_or(0.0)
    }

    /// Index `i` of the leg whose interval `[checkpoint[i], checkpoint[i + 1]]`
    /// contains `timestamp`, or `None` once the route has ended.
    pub fn segment_at(&self, timestamp: f64) -> Option<usize> {
        if self.0.len() < 2 || timestamp >= self.last() {
            return None;
        }

        let reached = self.0.partition_point(|&checkpoint| checkpoint <= timestamp);
        Some(reached.saturating_sub(1))
    }
}

use fleetpath_core::{InputValidationError, NodeIdx};
use fleetpath_matrix_providers::cost_matrix::CostMatrix;
use serde::{Deserialize, Serialize};

use crate::{kmh::Kmh, vehicle::VehicleIdx};

/// Input handed to a [`RouteSolver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetProblem {
    /// Integer arc costs, see [`CostMatrix::arc_costs`].
    pub cost_matrix: Vec<Vec<i64>>,
    pub n_vehicles: usize,
    pub start_nodes: Vec<NodeIdx>,
    pub end_nodes: Vec<NodeIdx>,
    /// Maximum route duration per vehicle, in minutes.
    pub max_duration: Vec<f64>,
    pub velocity: Vec<Kmh>,
}

impl FleetProblem {
    pub fn new(
        matrix: &CostMatrix,
        start_nodes: Vec<NodeIdx>,
        end_nodes: Vec<NodeIdx>,
        max_duration: Vec<f64>,
        velocity: Vec<Kmh>,
    ) -> Result<Self, InputValidationError> {
        let problem = Self {
            cost_matrix: matrix.arc_costs(),
            n_vehicles: start_nodes.len(),
            start_nodes,
            end_nodes,
            max_duration,
            velocity,
        };

        problem.validate()?;
        Ok(problem)
    }

    pub fn num_nodes(&self) -> usize {
        self.cost_matrix.len()
    }

    pub fn validate(&self) -> Result<(), InputValidationError> {
        let num_nodes = self.num_nodes();

        if self.cost_matrix.iter().any(|row| row.len() != num_nodes) {
            return Err(InputValidationError::InvalidConfiguration(
                "cost matrix must be square".to_owned(),
            ));
        }

        let lengths = [
            ("start_nodes", self.start_nodes.len()),
            ("end_nodes", self.end_nodes.len()),
            ("max_duration", self.max_duration.len()),
            ("velocity", self.velocity.len()),
        ];
        if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != self.n_vehicles) {
            return Err(InputValidationError::InvalidConfiguration(format!(
                "{} has {} entries for {} vehicles",
                name, len, self.n_vehicles
            )));
        }

        if let Some(node) = self
            .start_nodes
            .iter()
            .chain(&self.end_nodes)
            .find(|node| node.get() >= num_nodes)
        {
            return Err(InputValidationError::NodeOutOfRange {
                node: node.get(),
                num_nodes,
            });
        }

        if let Some(speed) = self
            .velocity
            .iter()
            .find(|speed| !speed.value().is_finite() || speed.value() <= 0.0)
        {
            return Err(InputValidationError::InvalidConfiguration(format!(
                "vehicle velocity must be positive, got {} km/h",
                speed.value()
            )));
        }

        Ok(())
    }

    /// Distance capacity of `vehicle` in meters: how far it can go within its
    /// maximum duration.
    pub fn max_travel_distance(&self, vehicle: VehicleIdx) -> Option<f64> {
        let speed = self.velocity.get(vehicle.get())?;
        let minutes = self.max_duration.get(vehicle.get())?;
        Some(speed.meters_per_minute() * minutes)
    }
}

/// One vehicle's solved route: the visited nodes and the cost of each arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedRoute {
    pub nodes: Vec<NodeIdx>,
    pub arc_costs: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSolution {
    pub routes: Vec<SolvedRoute>,
}

/// External combinatorial optimizer assigning nodes to vehicles.
///
/// `Ok(None)` means the problem is infeasible.
pub trait RouteSolver {
    type Error: std::error::Error + Send + Sync + 'static;

    fn solve(&self, problem: &FleetProblem) -> Result<Option<SolverSolution>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![0.0, 10.7, 20.2],
            vec![10.7, 0.0, 5.9],
            vec![20.2, 5.9, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn builds_integer_costs() {
        let problem = FleetProblem::new(
            &matrix(),
            vec![NodeIdx::new(0)],
            vec![NodeIdx::new(0)],
            vec![60.0],
            vec![Kmh::new(36.0)],
        )
        .unwrap();

        assert_eq!(problem.n_vehicles, 1);
        assert_eq!(problem.cost_matrix[0], vec![0, 10, 20]);
        assert_eq!(problem.cost_matrix[1], vec![10, 0, 5]);
    }

    #[test]
    fn computes_max_travel_distance() {
        let problem = FleetProblem::new(
            &matrix(),
            vec![NodeIdx::new(0), NodeIdx::new(1)],
            vec![NodeIdx::new(0), NodeIdx::new(2)],
            vec![60.0, 30.0],
            vec![Kmh::new(60.0), Kmh::new(36.0)],
        )
        .unwrap();

        let first = problem.max_travel_distance(VehicleIdx::new(0)).unwrap();
        let second = problem.max_travel_distance(VehicleIdx::new(1)).unwrap();
        assert!((first - 60_000.0).abs() < 1e-6);
        assert!((second - 18_000.0).abs() < 1e-6);
        assert_eq!(problem.max_travel_distance(VehicleIdx::new(2)), None);
    }

    #[test]
    fn rejects_mismatched_vehicle_arrays() {
        let result = FleetProblem::new(
            &matrix(),
            vec![NodeIdx::new(0), NodeIdx::new(1)],
            vec![NodeIdx::new(0)],
            vec![60.0, 60.0],
            vec![Kmh::new(50.0), Kmh::new(50.0)],
        );

        assert!(matches!(
            result,
            Err(InputValidationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_depots_outside_the_matrix() {
        let result = FleetProblem::new(
            &matrix(),
            vec![NodeIdx::new(3)],
            vec![NodeIdx::new(0)],
            vec![60.0],
            vec![Kmh::new(50.0)],
        );

        assert_eq!(
            result,
            Err(InputValidationError::NodeOutOfRange {
                node: 3,
                num_nodes: 3
            })
        );
    }

    #[test]
    fn rejects_stopped_vehicles() {
        let result = FleetProblem::new(
            &matrix(),
            vec![NodeIdx::new(0)],
            vec![NodeIdx::new(0)],
            vec![60.0],
            vec![Kmh::new(0.0)],
        );

        assert!(result.is_err());
    }
}

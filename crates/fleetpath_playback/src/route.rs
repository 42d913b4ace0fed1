use fleetpath_core::{Coordinate, InputValidationError, NodeIdx};
use fleetpath_matrix_providers::cost_matrix::CostMatrix;
use serde::{Deserialize, Serialize};

use crate::vehicle::VehicleIdx;

/// A solved vehicle route: the visited nodes in order, the coordinate of each
/// visit, and the vehicle's velocity in meters per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    nodes: Vec<NodeIdx>,
    coordinates: Vec<Coordinate>,
    velocity: f64,
}

impl Route {
    pub fn new(nodes: Vec<NodeIdx>, coordinates: Vec<Coordinate>, velocity: f64) -> Self {
        Self {
            nodes,
            coordinates,
            velocity,
        }
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn first_coordinate(&self) -> Option<&Coordinate> {
        self.coordinates.first()
    }

    pub fn last_coordinate(&self) -> Option<&Coordinate> {
        self.coordinates.last()
    }

    /// Number of legs, i.e. consecutive node pairs.
    pub fn num_legs(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Checks the route can be played back against `matrix`.
    pub fn validate(
        &self,
        vehicle: VehicleIdx,
        matrix: &CostMatrix,
    ) -> Result<(), InputValidationError> {
        let invalid = |reason: String| InputValidationError::InvalidRoute {
            vehicle: vehicle.get(),
            reason,
        };

        if self.nodes.len() < 2 {
            return Err(invalid(format!(
                "needs at least 2 nodes, got {}",
                self.nodes.len()
            )));
        }

        if self.coordinates.len() != self.nodes.len() {
            return Err(invalid(format!(
                "{} nodes but {} coordinates",
                self.nodes.len(),
                self.coordinates.len()
            )));
        }

        if !self.velocity.is_finite() || self.velocity <= 0.0 {
            return Err(invalid(format!(
                "velocity must be positive, got {}",
                self.velocity
            )));
        }

        if let Some(node) = self.nodes.iter().find(|&&node| !matrix.contains(node)) {
            return Err(InputValidationError::NodeOutOfRange {
                node: node.get(),
                num_nodes: matrix.num_nodes(),
            });
        }

        for coordinate in &self.coordinates {
            coordinate.validate()?;
        }

        let mut travel_time = 0.0;
        for leg in self.nodes.windows(2) {
            let cost = matrix.cost(leg[0], leg[1]);
            if !cost.is_finite() || cost < 0.0 {
                return Err(invalid(format!(
                    "leg {} -> {} has cost {}, expected a finite non-negative value",
                    leg[0], leg[1], cost
                )));
            }

            travel_time += cost / self.velocity;
        }

        if !travel_time.is_finite() {
            return Err(invalid(format!(
                "travel time overflows at velocity {}",
                self.velocity
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fleetpath_matrix_providers::as_the_crow_flies::as_the_crow_flies_matrix;

    use super::*;

    fn matrix() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![0.0, 100.0, 50.0],
            vec![100.0, 0.0, -1.0],
            vec![50.0, 70.0, 0.0],
        ])
        .unwrap()
    }

    fn coordinates(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| Coordinate::new(0.0, i as f64)).collect()
    }

    fn nodes(indices: &[usize]) -> Vec<NodeIdx> {
        indices.iter().map(|&i| NodeIdx::new(i)).collect()
    }

    #[test]
    fn accepts_a_round_trip() {
        let route = Route::new(nodes(&[0, 2, 0]), coordinates(3), 10.0);
        assert_eq!(route.validate(VehicleIdx::new(0), &matrix()), Ok(()));
        assert_eq!(route.num_legs(), 2);
    }

    #[test]
    fn rejects_short_routes() {
        let route = Route::new(nodes(&[0]), coordinates(1), 10.0);
        assert!(matches!(
            route.validate(VehicleIdx::new(3), &matrix()),
            Err(InputValidationError::InvalidRoute { vehicle: 3, .. })
        ));
    }

    #[test]
    fn rejects_mismatched_coordinates() {
        let route = Route::new(nodes(&[0, 1]), coordinates(3), 10.0);
        assert!(route.validate(VehicleIdx::new(0), &matrix()).is_err());
    }

    #[test]
    fn rejects_non_positive_velocity() {
        for velocity in [0.0, -2.0, f64::NAN] {
            let route = Route::new(nodes(&[0, 1]), coordinates(2), velocity);
            assert!(route.validate(VehicleIdx::new(0), &matrix()).is_err());
        }
    }

    #[test]
    fn rejects_nodes_outside_the_matrix() {
        let route = Route::new(nodes(&[0, 5]), coordinates(2), 10.0);
        assert_eq!(
            route.validate(VehicleIdx::new(0), &matrix()),
            Err(InputValidationError::NodeOutOfRange {
                node: 5,
                num_nodes: 3
            })
        );
    }

    #[test]
    fn rejects_negative_leg_costs() {
        let route = Route::new(nodes(&[0, 1, 2]), coordinates(3), 10.0);
        assert!(route.validate(VehicleIdx::new(0), &matrix()).is_err());
    }

    #[test]
    fn rejects_non_finite_leg_costs() {
        let matrix = as_the_crow_flies_matrix(&[
            Coordinate::new(f64::NAN, 0.0),
            Coordinate::new(0.0, 1.0),
        ]);
        let route = Route::new(nodes(&[0, 1]), coordinates(2), 10.0);

        assert!(matches!(
            route.validate(VehicleIdx::new(0), &matrix),
            Err(InputValidationError::InvalidRoute { vehicle: 0, .. })
        ));
    }

    #[test]
    fn rejects_overflowing_travel_time() {
        let matrix = CostMatrix::from_rows(vec![vec![0.0, 1e300], vec![1e300, 0.0]]).unwrap();
        let route = Route::new(nodes(&[0, 1]), coordinates(2), 1e-300);

        assert!(route.validate(VehicleIdx::new(0), &matrix).is_err());
    }

    #[test]
    fn rejects_invalid_coordinates() {
        let route = Route::new(
            nodes(&[0, 1]),
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 200.0)],
            10.0,
        );

        assert_eq!(
            route.validate(VehicleIdx::new(0), &matrix()),
            Err(InputValidationError::LongitudeOutOfRange(200.0))
        );
    }

    #[test]
    fn deserializes_from_json() {
        let route: Route = serde_json::from_str(
            r#"{"nodes": [0, 1], "coordinates": [[0.0, 0.0], [0.0, 1.0]], "velocity": 10.0}"#,
        )
        .unwrap();

        assert_eq!(route.nodes(), &nodes(&[0, 1])[..]);
        assert_eq!(route.last_coordinate(), Some(&Coordinate::new(0.0, 1.0)));
    }
}

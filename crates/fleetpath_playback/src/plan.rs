use fleetpath_core::{Coordinate, NodeIdx};
use jiff::SignedDuration;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    error::PlanningError,
    route::Route,
    solver::{FleetProblem, RouteSolver, SolvedRoute},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRoute {
    pub route: Route,
    pub time: SignedDuration,
    /// Display colour as `#RRGGBB`.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetPlan {
    pub routes: Vec<PlannedRoute>,
    /// Duration of the longest route.
    pub total_time: SignedDuration,
}

impl FleetPlan {
    /// Routes ready for playback, in vehicle order.
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .iter()
            .map(|planned| planned.route.clone())
            .collect()
    }
}

/// Runs `solver` on `problem` and turns its answer into playable routes.
///
/// `coordinates` is indexed by node. An infeasible problem is reported as
/// [`PlanningError::NoSolution`].
#[instrument(skip_all, fields(n_vehicles = problem.n_vehicles), level = "debug")]
pub fn plan_routes<S: RouteSolver>(
    solver: &S,
    problem: &FleetProblem,
    coordinates: &[Coordinate],
) -> Result<FleetPlan, PlanningError> {
    problem.validate()?;

    let solution = solver
        .solve(problem)
        .map_err(|err| PlanningError::Solver(Box::new(err)))?
        .ok_or(PlanningError::NoSolution)?;

    if solution.routes.len() != problem.n_vehicles {
        return Err(PlanningError::InvalidSolution(format!(
            "expected {} routes, got {}",
            problem.n_vehicles,
            solution.routes.len()
        )));
    }

    let colors = route_colors(problem.n_vehicles);
    let routes = solution
        .routes
        .iter()
        .zip(&problem.velocity)
        .zip(colors)
        .map(|((solved, speed), color)| -> Result<PlannedRoute, PlanningError> {
            let velocity = speed.meters_per_second();
            let route = Route::new(
                solved.nodes.clone(),
                route_coordinates(solved, coordinates)?,
                velocity,
            );
            let total_cost: i64 = solved.arc_costs.iter().sum();

            Ok(PlannedRoute {
                route,
                time: SignedDuration::from_secs((total_cost as f64 / velocity) as i64),
                color,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_time = routes
        .iter()
        .map(|planned| planned.time)
        .max()
        .unwrap_or(SignedDuration::ZERO);

    info!("Planned {} routes, longest takes {:#}", routes.len(), total_time);

    Ok(FleetPlan { routes, total_time })
}

fn route_coordinates(
    solved: &SolvedRoute,
    coordinates: &[Coordinate],
) -> Result<Vec<Coordinate>, PlanningError> {
    if solved.nodes.len() < 2 {
        return Err(PlanningError::InvalidSolution(format!(
            "a route needs at least 2 nodes, got {}",
            solved.nodes.len()
        )));
    }

    if solved.arc_costs.len() + 1 != solved.nodes.len() {
        return Err(PlanningError::InvalidSolution(format!(
            "{} arc costs for {} nodes",
            solved.arc_costs.len(),
            solved.nodes.len()
        )));
    }

    solved
        .nodes
        .iter()
        .map(|node: &NodeIdx| {
            coordinates.get(node.get()).copied().ok_or_else(|| {
                PlanningError::InvalidSolution(format!(
                    "node {} has no coordinate ({} known)",
                    node,
                    coordinates.len()
                ))
            })
        })
        .collect()
}

/// `count` colours with evenly spaced hues at full saturation and value.
pub fn route_colors(count: usize) -> Vec<String> {
    (0..count)
        .map(|index| {
            let hue = (index * 360 / count) as f64;
            let (r, g, b) = hsv_to_rgb(hue);
            format!(
                "#{:02X}{:02X}{:02X}",
                (r * 255.0) as u8,
                (g * 255.0) as u8,
                (b * 255.0) as u8
            )
        })
        .collect()
}

fn hsv_to_rgb(hue: f64) -> (f64, f64, f64) {
    let sector = hue / 60.0;
    let x = 1.0 - (sector % 2.0 - 1.0).abs();

    match sector as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use fleetpath_matrix_providers::cost_matrix::CostMatrix;

    use super::*;
    use crate::{kmh::Kmh, solver::SolverSolution};

    struct FixedSolver(Option<SolverSolution>);

    impl RouteSolver for FixedSolver {
        type Error = Infallible;

        fn solve(&self, _: &FleetProblem) -> Result<Option<SolverSolution>, Self::Error> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("solver crashed")]
    struct Crashed;

    struct FailingSolver;

    impl RouteSolver for FailingSolver {
        type Error = Crashed;

        fn solve(&self, _: &FleetProblem) -> Result<Option<SolverSolution>, Self::Error> {
            Err(Crashed)
        }
    }

    fn coordinates() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.01),
            Coordinate::new(0.01, 0.0),
        ]
    }

    fn problem() -> FleetProblem {
        let matrix = CostMatrix::from_rows(vec![
            vec![0.0, 1000.0, 2000.0],
            vec![1000.0, 0.0, 1500.0],
            vec![2000.0, 1500.0, 0.0],
        ])
        .unwrap();

        FleetProblem::new(
            &matrix,
            vec![NodeIdx::new(0), NodeIdx::new(0)],
            vec![NodeIdx::new(0), NodeIdx::new(0)],
            vec![120.0, 120.0],
            vec![Kmh::new(36.0), Kmh::new(72.0)],
        )
        .unwrap()
    }

    fn solution() -> SolverSolution {
        SolverSolution {
            routes: vec![
                SolvedRoute {
                    nodes: vec![NodeIdx::new(0), NodeIdx::new(1), NodeIdx::new(0)],
                    arc_costs: vec![1000, 1000],
                },
                SolvedRoute {
                    nodes: vec![NodeIdx::new(0), NodeIdx::new(2), NodeIdx::new(0)],
                    arc_costs: vec![2000, 2000],
                },
            ],
        }
    }

    #[test]
    fn converts_solution_into_routes() {
        let plan = plan_routes(&FixedSolver(Some(solution())), &problem(), &coordinates()).unwrap();

        assert_eq!(plan.routes.len(), 2);

        let first = &plan.routes[0].route;
        assert_eq!(first.coordinates()[1], coordinates()[1]);
        assert!((first.velocity() - 10.0).abs() < 1e-12);
        assert_eq!(plan.routes[0].time, SignedDuration::from_secs(200));
        assert_eq!(plan.routes[1].time, SignedDuration::from_secs(200));
        assert_eq!(plan.total_time, SignedDuration::from_secs(200));
        assert_eq!(plan.routes()[1].nodes(), solution().routes[1].nodes.as_slice());
    }

    #[test]
    fn missing_solution_is_an_error() {
        let result = plan_routes(&FixedSolver(None), &problem(), &coordinates());
        assert!(matches!(result, Err(PlanningError::NoSolution)));
    }

    #[test]
    fn solver_failures_are_wrapped() {
        let result = plan_routes(&FailingSolver, &problem(), &coordinates());
        assert!(matches!(result, Err(PlanningError::Solver(_))));
    }

    #[test]
    fn rejects_solutions_with_unknown_nodes() {
        let mut solution = solution();
        solution.routes[0].nodes[1] = NodeIdx::new(9);

        let result = plan_routes(&FixedSolver(Some(solution)), &problem(), &coordinates());
        assert!(matches!(result, Err(PlanningError::InvalidSolution(_))));
    }

    #[test]
    fn rejects_wrong_route_count() {
        let mut solution = solution();
        solution.routes.pop();

        let result = plan_routes(&FixedSolver(Some(solution)), &problem(), &coordinates());
        assert!(matches!(result, Err(PlanningError::InvalidSolution(_))));
    }

    #[test]
    fn spreads_colors_over_the_hue_circle() {
        assert_eq!(route_colors(3), vec!["#FF0000", "#00FF00", "#0000FF"]);
        assert_eq!(route_colors(1), vec!["#FF0000"]);
        assert!(route_colors(0).is_empty());
    }
}

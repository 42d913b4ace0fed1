use fleetpath_core::InputValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("The route solver found no solution")]
    NoSolution,

    #[error("Route solver failed: {0}")]
    Solver(Box<dyn std::error::Error + Send + Sync>),

    #[error("Route solver returned an invalid solution: {0}")]
    InvalidSolution(String),

    #[error(transparent)]
    InputValidation(#[from] InputValidationError),
}

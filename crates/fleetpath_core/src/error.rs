use thiserror::Error;

/// Input rejected before any computation or network call happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputValidationError {
    #[error("Coordinate must have 2 or 3 components, got {0}")]
    CoordinateArity(usize),

    #[error("Coordinate component is not a finite number: {0}")]
    NonFiniteCoordinate(f64),

    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Unsupported travel mode: {0}")]
    UnsupportedTravelMode(String),

    #[error("Node {node} is outside a matrix of {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    #[error("Invalid route for vehicle {vehicle}: {reason}")]
    InvalidRoute { vehicle: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

use fleetpath_core::{Coordinate, InputValidationError, NodeIdx};
use thiserror::Error;

use crate::distance_backend::ElementStatus;

#[derive(Debug, Error)]
pub enum ExternalServiceError {
    #[error(
        "{} Check origin {origin} ({origin_coordinate:?}) and destination {destination} ({destination_coordinate:?})",
        .status.description()
    )]
    Element {
        origin: NodeIdx,
        destination: NodeIdx,
        origin_coordinate: Coordinate,
        destination_coordinate: Coordinate,
        status: ElementStatus,
    },

    #[error("Distance backend answered with status {status}: {message}")]
    RequestStatus { status: String, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No distance backend configured for travel mode {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CostMatrixError {
    #[error(transparent)]
    InputValidation(#[from] InputValidationError),

    #[error(transparent)]
    ExternalService(#[from] ExternalServiceError),
}

use std::{fmt::Display, future::Future};

use fleetpath_core::Coordinate;
use serde::Deserialize;

use crate::{error::ExternalServiceError, travel_mode::TravelMode};

/// Per-cell outcome reported by a distance backend.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxRouteLengthExceeded,
    #[serde(other)]
    Unknown,
}

impl ElementStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ElementStatus::Ok)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ElementStatus::Ok => "Valid result.",
            ElementStatus::NotFound => "The origin and/or destination can not be geocoded.",
            ElementStatus::ZeroResults => {
                "No route could be found between the origin and destination."
            }
            ElementStatus::MaxRouteLengthExceeded => {
                "The requested route is too long and cannot be processed."
            }
            ElementStatus::Unknown => "The distance backend returned an unknown status.",
        }
    }
}

impl Display for ElementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ElementStatus::Ok => "OK",
                ElementStatus::NotFound => "NOT_FOUND",
                ElementStatus::ZeroResults => "ZERO_RESULTS",
                ElementStatus::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
                ElementStatus::Unknown => "UNKNOWN",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendElement {
    pub status: ElementStatus,

    /// Travel cost; only meaningful when `status` is OK.
    pub value: Option<f64>,
}

impl BackendElement {
    pub fn ok(value: f64) -> Self {
        Self {
            status: ElementStatus::Ok,
            value: Some(value),
        }
    }

    pub fn failed(status: ElementStatus) -> Self {
        Self {
            status,
            value: None,
        }
    }
}

/// One block: every origin paired with every destination.
#[derive(Debug, Clone, Copy)]
pub struct BlockRequest<'a> {
    pub origins: &'a [Coordinate],
    pub destinations: &'a [Coordinate],
    pub mode: TravelMode,
}

/// Row-major answer to a [`BlockRequest`]: one row per origin, one element per destination.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockResponse {
    pub rows: Vec<Vec<BackendElement>>,
}

/// External service answering origin × destination blocks for queried travel modes.
///
/// Implementations report cell statuses as-is; validating them is the caller's job.
pub trait DistanceBackend {
    fn fetch_block(
        &self,
        request: BlockRequest<'_>,
    ) -> impl Future<Output = Result<BlockResponse, ExternalServiceError>> + Send;
}

/// Backend for setups that only ever build analytic matrices.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDistanceBackend;

impl DistanceBackend for NoDistanceBackend {
    async fn fetch_block(
        &self,
        request: BlockRequest<'_>,
    ) -> Result<BlockResponse, ExternalServiceError> {
        Err(ExternalServiceError::Unavailable(request.mode.to_string()))
    }
}

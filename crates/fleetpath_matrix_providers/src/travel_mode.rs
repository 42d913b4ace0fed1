use std::{fmt::Display, str::FromStr};

use fleetpath_core::InputValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    /// Straight great-circle legs, computed locally.
    Flight,
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Analytic modes never touch the distance backend.
    pub fn is_analytic(&self) -> bool {
        matches!(self, TravelMode::Flight)
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Flight => "flight",
                TravelMode::Driving => "driving",
                TravelMode::Walking => "walking",
                TravelMode::Bicycling => "bicycling",
                TravelMode::Transit => "transit",
            }
        )
    }
}

impl FromStr for TravelMode {
    type Err = InputValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flight" | "geodesic" => Ok(TravelMode::Flight),
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "bicycling" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(InputValidationError::UnsupportedTravelMode(
                value.to_string(),
            )),
        }
    }
}

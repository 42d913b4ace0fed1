use serde::{Deserialize, Serialize};

use crate::error::InputValidationError;

/// A waypoint position: latitude and longitude in degrees, altitude in meters.
///
/// Equality is exact on every component. Two coordinates are the same node
/// only if they carry bit-for-bit equal values, and altitude takes part in the
/// comparison when present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    alt: Option<f64>,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            alt: None,
        }
    }

    pub const fn with_altitude(lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            lat,
            lon,
            alt: Some(alt),
        }
    }

    /// Builds a coordinate, rejecting non-finite values and out-of-range degrees.
    pub fn try_new(lat: f64, lon: f64, alt: Option<f64>) -> Result<Self, InputValidationError> {
        for value in [Some(lat), Some(lon), alt].into_iter().flatten() {
            if !value.is_finite() {
                return Err(InputValidationError::NonFiniteCoordinate(value));
            }
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InputValidationError::LatitudeOutOfRange(lat));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(InputValidationError::LongitudeOutOfRange(lon));
        }

        Ok(Self { lat, lon, alt })
    }

    /// Applies the [`Coordinate::try_new`] checks to a coordinate built with `new`.
    pub fn validate(&self) -> Result<(), InputValidationError> {
        Self::try_new(self.lat, self.lon, self.alt).map(|_| ())
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn alt(&self) -> Option<f64> {
        self.alt
    }

    pub(crate) fn from_parts(lat: f64, lon: f64, alt: Option<f64>) -> Self {
        Self { lat, lon, alt }
    }
}

impl TryFrom<&[f64]> for Coordinate {
    type Error = InputValidationError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match *values {
            [lat, lon] => Coordinate::try_new(lat, lon, None),
            [lat, lon, alt] => Coordinate::try_new(lat, lon, Some(alt)),
            _ => Err(InputValidationError::CoordinateArity(values.len())),
        }
    }
}

/// Accepted wire shapes: `[lat, lon]`, `[lat, lon, alt]` or `{lat, lon, alt?}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Array(Vec<f64>),
    Object {
        lat: f64,
        lon: f64,
        alt: Option<f64>,
    },
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InputValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        match raw {
            RawCoordinate::Array(values) => Coordinate::try_from(values.as_slice()),
            RawCoordinate::Object { lat, lon, alt } => Coordinate::try_new(lat, lon, alt),
        }
    }
}

impl From<&Coordinate> for geo_types::Point {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Point::new(coordinate.lon, coordinate.lat)
    }
}

impl From<Coordinate> for geo_types::Point {
    fn from(coordinate: Coordinate) -> Self {
        (&coordinate).into()
    }
}

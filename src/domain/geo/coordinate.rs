//! Coordinates and location queries

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Decimal places kept when coordinates are used as cache keys (~11 m).
pub const COORDINATE_KEY_PRECISION: i32 = 4;

/// A validated WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = DomainError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range or non-finite values
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::validation(format!(
                "Invalid latitude {}: must be between -90 and 90",
                lat
            )));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::validation(format!(
                "Invalid longitude {}: must be between -180 and 180",
                lng
            )));
        }

        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Stable textual form used in cache keys; near-duplicate points collapse.
    pub fn key_component(&self) -> String {
        format!(
            "{:.4},{:.4}",
            round_to(self.lat, COORDINATE_KEY_PRECISION),
            round_to(self.lng, COORDINATE_KEY_PRECISION)
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Rounds to `decimals` places; negative zero is folded into zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;

    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Caller-supplied location: either a free-form address or a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationInput", into = "LocationInput")]
pub enum LocationQuery {
    Address(String),
    Coordinate(Coordinate),
}

impl LocationQuery {
    pub fn address(address: impl Into<String>) -> Result<Self, DomainError> {
        LocationInput {
            address: Some(address.into()),
            ..Default::default()
        }
        .try_into()
    }

    pub fn coordinate(lat: f64, lng: f64) -> Result<Self, DomainError> {
        Ok(Self::Coordinate(Coordinate::new(lat, lng)?))
    }

    /// The coordinate if one was given directly
    pub fn as_coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Coordinate(coordinate) => Some(*coordinate),
            Self::Address(_) => None,
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{}", address),
            Self::Coordinate(coordinate) => write!(f, "{}", coordinate),
        }
    }
}

/// Wire shape of a location: `{address}` or `{lat, lng}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl TryFrom<LocationInput> for LocationQuery {
    type Error = DomainError;

    fn try_from(input: LocationInput) -> Result<Self, Self::Error> {
        let address = input
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        let has_any_coordinate = input.lat.is_some() || input.lng.is_some();

        match (address, input.lat, input.lng) {
            (Some(_), _, _) if has_any_coordinate => Err(DomainError::validation(
                "Provide either 'address' OR coordinates, not both",
            )),
            (Some(address), None, None) => Ok(Self::Address(address)),
            (None, Some(lat), Some(lng)) => Ok(Self::Coordinate(Coordinate::new(lat, lng)?)),
            _ => Err(DomainError::validation(
                "Must provide either 'address' or both 'lat' and 'lng'",
            )),
        }
    }
}

impl From<LocationQuery> for LocationInput {
    fn from(query: LocationQuery) -> Self {
        match query {
            LocationQuery::Address(address) => Self {
                address: Some(address),
                ..Default::default()
            },
            LocationQuery::Coordinate(coordinate) => Self {
                address: None,
                lat: Some(coordinate.lat()),
                lng: Some(coordinate.lng()),
            },
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::geo::Coordinate;
use crate::domain::DomainError;

/// A place found by a nearby search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub place_id: String,
    pub coordinate: Coordinate,
    /// Always computed from the query coordinate, never taken from upstream
    pub distance_meters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl PlaceRecord {
    /// Drops optional fields not listed; `None` keeps everything.
    pub fn retain_fields(mut self, fields: Option<&[PlaceField]>) -> Self {
        let Some(fields) = fields else {
            return self;
        };
        let keep = |field: PlaceField| fields.contains(&field);

        if !keep(PlaceField::Rating) {
            self.rating = None;
        }
        if !keep(PlaceField::UserRatingsTotal) {
            self.user_ratings_total = None;
        }
        if !keep(PlaceField::Address) {
            self.address = None;
        }
        if !keep(PlaceField::PhoneNumber) {
            self.phone_number = None;
        }
        if !keep(PlaceField::Website) {
            self.website = None;
        }
        if !keep(PlaceField::PriceLevel) {
            self.price_level = None;
        }
        if !keep(PlaceField::OpeningHours) {
            self.opening_hours = None;
        }
        if !keep(PlaceField::Types) {
            self.types.clear();
        }

        self
    }
}

/// Optional place attributes a caller can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceField {
    Rating,
    UserRatingsTotal,
    Address,
    PhoneNumber,
    Website,
    PriceLevel,
    OpeningHours,
    Types,
}

impl PlaceField {
    pub const ALL: [PlaceField; 8] = [
        Self::Rating,
        Self::UserRatingsTotal,
        Self::Address,
        Self::PhoneNumber,
        Self::Website,
        Self::PriceLevel,
        Self::OpeningHours,
        Self::Types,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::UserRatingsTotal => "user_ratings_total",
            Self::Address => "address",
            Self::PhoneNumber => "phone_number",
            Self::Website => "website",
            Self::PriceLevel => "price_level",
            Self::OpeningHours => "opening_hours",
            Self::Types => "types",
        }
    }
}

impl fmt::Display for PlaceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| {
                let available: Vec<_> = Self::ALL.iter().map(PlaceField::as_str).collect();
                DomainError::validation(format!(
                    "Unknown field '{}'. Available fields: {}",
                    s,
                    available.join(", ")
                ))
            })
    }
}

/// Forward geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub coordinate: Coordinate,
    pub formatted_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Reverse geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocodeResult {
    pub coordinate: Coordinate,
    pub formatted_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" => Ok(Self::Driving),
            "walking" => Ok(Self::Walking),
            "bicycling" => Ok(Self::Bicycling),
            "transit" => Ok(Self::Transit),
            other => Err(DomainError::validation(format!(
                "Unknown travel mode '{}': expected driving, walking, bicycling or transit",
                other
            ))),
        }
    }
}

/// One origin/destination cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixElement {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

impl DistanceMatrixElement {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixRow {
    pub elements: Vec<DistanceMatrixElement>,
}

/// Raw matrix: one row per origin, one element per destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    pub mode: TravelMode,
    pub rows: Vec<DistanceMatrixRow>,
}

/// Flattened origin/destination pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixEntry {
    pub origin: String,
    pub destination: String,
    pub distance_meters: Option<u64>,
    pub duration_seconds: Option<u64>,
    pub status: String,
}

impl DistanceMatrix {
    /// Flattens rows into pairs; distance and duration only for `OK` cells
    pub fn entries(&self) -> Vec<DistanceMatrixEntry> {
        let label = |labels: &[String], index: usize| {
            labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string())
        };

        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.elements.iter().enumerate().map(move |(j, element)| {
                    let ok = element.is_ok();
                    DistanceMatrixEntry {
                        origin: label(&self.origins, i),
                        destination: label(&self.destinations, j),
                        distance_meters: element.distance_meters.filter(|_| ok),
                        duration_seconds: element.duration_seconds.filter(|_| ok),
                        status: element.status.clone(),
                    }
                })
            })
            .collect()
    }
}

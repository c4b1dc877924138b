use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::geo::{haversine_distance, Coordinate};
use crate::domain::place::{
    DistanceMatrix, GeocodeResult, PlaceRecord, ReverseGeocodeResult, TravelMode,
};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Parameters of a single upstream nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    pub coordinate: Coordinate,
    pub place_type: String,
    pub radius_meters: u32,
    /// Page size requested from the provider
    pub max_results: u32,
}

/// A place as reported by the provider, before local distance is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    pub name: String,
    pub place_id: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub price_level: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<serde_json::Value>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl RawPlace {
    pub fn new(name: impl Into<String>, place_id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            place_id: place_id.into(),
            coordinate,
            rating: None,
            user_ratings_total: None,
            address: None,
            phone_number: None,
            website: None,
            price_level: None,
            opening_hours: None,
            types: Vec::new(),
        }
    }

    /// Converts into a record whose distance is measured from `origin`
    pub fn into_record(self, origin: &Coordinate) -> PlaceRecord {
        PlaceRecord {
            distance_meters: haversine_distance(origin, &self.coordinate),
            name: self.name,
            place_id: self.place_id,
            coordinate: self.coordinate,
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            address: self.address,
            phone_number: self.phone_number,
            website: self.website,
            price_level: self.price_level,
            opening_hours: self.opening_hours,
            types: self.types,
        }
    }
}

/// Narrow port onto the external geocoding/places/routing provider
///
/// Implementations perform exactly one upstream request per call and do no
/// caching or rate limiting of their own. An empty geocode result is `Ok(vec![])`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, DomainError>;

    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<ReverseGeocodeResult>, DomainError>;

    async fn nearby_search(&self, request: NearbyRequest) -> Result<Vec<RawPlace>, DomainError>;

    async fn distance_matrix(
        &self,
        origins: Vec<String>,
        destinations: Vec<String>,
        mode: TravelMode,
    ) -> Result<DistanceMatrix, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::place::{
    AddressComponent, DistanceMatrix, DistanceMatrixElement, DistanceMatrixRow, GeocodeResult,
    ReverseGeocodeResult, TravelMode,
};
use crate::domain::{Coordinate, DomainError, NearbyRequest, PlacesProvider, RawPlace};

pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com";

const NEARBY_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.location,places.rating,places.userRatingCount,places.nationalPhoneNumber,\
places.websiteUri,places.priceLevel,places.currentOpeningHours,places.types";

/// Google Maps provider: legacy Geocoding/Distance Matrix plus Places API (New)
#[derive(Debug)]
pub struct GoogleMapsProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    maps_base_url: String,
    places_base_url: String,
}

impl<C: HttpClientTrait> GoogleMapsProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_urls(client, api_key, DEFAULT_MAPS_BASE_URL, DEFAULT_PLACES_BASE_URL)
    }

    pub fn with_base_urls(
        client: C,
        api_key: impl Into<String>,
        maps_base_url: impl Into<String>,
        places_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            maps_base_url: maps_base_url.into().trim_end_matches('/').to_string(),
            places_base_url: places_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn geocode_url(&self) -> String {
        format!("{}/maps/api/geocode/json", self.maps_base_url)
    }

    fn distance_matrix_url(&self) -> String {
        format!("{}/maps/api/distancematrix/json", self.maps_base_url)
    }

    fn nearby_url(&self) -> String {
        format!("{}/v1/places:searchNearby", self.places_base_url)
    }

    async fn fetch_geocode(
        &self,
        operation: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<GeocodeEntry>, DomainError> {
        let json = self
            .client
            .get_json(&self.geocode_url(), query)
            .await
            .map_err(|e| relabel(operation, e))?;

        let response: GeocodeResponse = parse(operation, json)?;
        match response.status.as_str() {
            "OK" => Ok(response.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(status_error(operation, status, response.error_message)),
        }
    }
}

/// Attributes an HTTP-level failure to the provider operation
fn relabel(operation: &str, error: DomainError) -> DomainError {
    match error {
        DomainError::Upstream { message, .. } => DomainError::upstream(operation, message),
        other => other.into_upstream(operation),
    }
}

fn parse<T: for<'de> Deserialize<'de>>(
    operation: &str,
    json: serde_json::Value,
) -> Result<T, DomainError> {
    serde_json::from_value(json)
        .map_err(|e| DomainError::upstream(operation, format!("Failed to parse response: {}", e)))
}

fn status_error(operation: &str, status: &str, message: Option<String>) -> DomainError {
    match message {
        Some(message) => DomainError::upstream(operation, format!("{}: {}", status, message)),
        None => DomainError::upstream(operation, status.to_string()),
    }
}

fn coordinate(operation: &str, lat: f64, lng: f64) -> Result<Coordinate, DomainError> {
    Coordinate::new(lat, lng).map_err(|e| e.into_upstream(operation))
}

#[async_trait]
impl<C: HttpClientTrait> PlacesProvider for GoogleMapsProvider<C> {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, DomainError> {
        let query = [("address", address.to_string()), ("key", self.api_key.clone())];

        self.fetch_geocode("geocode", &query)
            .await?
            .into_iter()
            .map(|entry| {
                Ok(GeocodeResult {
                    coordinate: coordinate(
                        "geocode",
                        entry.geometry.location.lat,
                        entry.geometry.location.lng,
                    )?,
                    formatted_address: entry.formatted_address,
                    place_id: entry.place_id,
                })
            })
            .collect()
    }

    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<ReverseGeocodeResult>, DomainError> {
        let query = [
            ("latlng", format!("{},{}", coordinate.lat(), coordinate.lng())),
            ("key", self.api_key.clone()),
        ];

        Ok(self
            .fetch_geocode("reverse_geocode", &query)
            .await?
            .into_iter()
            .map(|entry| ReverseGeocodeResult {
                coordinate,
                formatted_address: entry.formatted_address,
                place_id: entry.place_id,
                address_components: entry.address_components,
            })
            .collect())
    }

    async fn nearby_search(&self, request: NearbyRequest) -> Result<Vec<RawPlace>, DomainError> {
        let body = serde_json::json!({
            "includedTypes": [request.place_type],
            "maxResultCount": request.max_results,
            "locationRestriction": {
                "circle": {
                    "center": {
                        "latitude": request.coordinate.lat(),
                        "longitude": request.coordinate.lng(),
                    },
                    "radius": f64::from(request.radius_meters),
                }
            },
            "rankPreference": "DISTANCE",
        });
        let headers = vec![
            ("Content-Type", "application/json"),
            ("X-Goog-Api-Key", self.api_key.as_str()),
            ("X-Goog-FieldMask", NEARBY_FIELD_MASK),
        ];

        let json = self
            .client
            .post_json(&self.nearby_url(), headers, &body)
            .await
            .map_err(|e| relabel("nearby_search", e))?;
        let response: NearbyResponse = parse("nearby_search", json)?;

        let places: Vec<RawPlace> = response
            .places
            .into_iter()
            .filter_map(GooglePlace::into_raw)
            .collect();

        debug!(
            place_type = %request.place_type,
            count = places.len(),
            "Places API nearby search returned"
        );

        Ok(places)
    }

    async fn distance_matrix(
        &self,
        origins: Vec<String>,
        destinations: Vec<String>,
        mode: TravelMode,
    ) -> Result<DistanceMatrix, DomainError> {
        let query = [
            ("origins", origins.join("|")),
            ("destinations", destinations.join("|")),
            ("mode", mode.to_string()),
            ("key", self.api_key.clone()),
        ];

        let json = self
            .client
            .get_json(&self.distance_matrix_url(), &query)
            .await
            .map_err(|e| relabel("distance_matrix", e))?;
        let response: DistanceMatrixResponse = parse("distance_matrix", json)?;

        if response.status != "OK" {
            return Err(status_error(
                "distance_matrix",
                &response.status,
                response.error_message,
            ));
        }

        let rows = response
            .rows
            .into_iter()
            .map(|row| DistanceMatrixRow {
                elements: row
                    .elements
                    .into_iter()
                    .map(|element| DistanceMatrixElement {
                        status: element.status,
                        distance_meters: element.distance.map(|d| d.value),
                        duration_seconds: element.duration.map(|d| d.value),
                    })
                    .collect(),
            })
            .collect();

        Ok(DistanceMatrix {
            origins,
            destinations,
            mode,
            rows,
        })
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

// Geocoding API wire types

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeEntry>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    formatted_address: String,
    place_id: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

// Places API (New) wire types

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    places: Vec<GooglePlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePlace {
    #[serde(default)]
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    location: Option<PlaceLocation>,
    rating: Option<f64>,
    user_rating_count: Option<u32>,
    national_phone_number: Option<String>,
    website_uri: Option<String>,
    price_level: Option<String>,
    current_opening_hours: Option<serde_json::Value>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl GooglePlace {
    /// Places without a usable location are dropped
    fn into_raw(self) -> Option<RawPlace> {
        let location = self.location?;
        let coordinate = Coordinate::new(location.latitude?, location.longitude?).ok()?;

        let name = self
            .display_name
            .map(|d| d.text)
            .unwrap_or_else(|| "Unknown".to_string());
        let place_id = self
            .id
            .strip_prefix("places/")
            .unwrap_or(&self.id)
            .to_string();

        Some(RawPlace {
            name,
            place_id,
            coordinate,
            rating: self.rating,
            user_ratings_total: self.user_rating_count,
            address: self.formatted_address,
            phone_number: self.national_phone_number,
            website: self.website_uri,
            price_level: self.price_level,
            opening_hours: self.current_opening_hours,
            types: self.types,
        })
    }
}

// Distance Matrix API wire types

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<ValueText>,
    duration: Option<ValueText>,
}

#[derive(Debug, Deserialize)]
struct ValueText {
    value: u64,
}

//! Scripted provider for orchestration tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{NearbyRequest, PlacesProvider, RawPlace};
use crate::domain::geo::Coordinate;
use crate::domain::place::{
    DistanceMatrix, DistanceMatrixElement, DistanceMatrixRow, GeocodeResult,
    ReverseGeocodeResult, TravelMode,
};
use crate::domain::DomainError;

fn address_key(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Provider whose answers, failures and latencies are set up front
#[derive(Debug, Default)]
pub struct FakePlacesProvider {
    geocodes: HashMap<String, Coordinate>,
    failing_addresses: HashSet<String>,
    places: HashMap<String, Vec<RawPlace>>,
    failing_searches: HashSet<(String, String)>,
    geocode_delays: HashMap<String, Duration>,
    search_delays: HashMap<String, Duration>,
    latency: Duration,
    geocode_calls: AtomicUsize,
    reverse_geocode_calls: AtomicUsize,
    nearby_calls: AtomicUsize,
    distance_matrix_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakePlacesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geocode(mut self, address: &str, lat: f64, lng: f64) -> Self {
        let coordinate = Coordinate::new(lat, lng).expect("valid test coordinate");
        self.geocodes.insert(address_key(address), coordinate);
        self
    }

    pub fn with_geocode_failure(mut self, address: &str) -> Self {
        self.failing_addresses.insert(address_key(address));
        self
    }

    pub fn with_geocode_delay(mut self, address: &str, delay: Duration) -> Self {
        self.geocode_delays.insert(address_key(address), delay);
        self
    }

    /// Places returned for `place_type` at any coordinate
    pub fn with_places(mut self, place_type: &str, places: Vec<RawPlace>) -> Self {
        self.places.insert(place_type.to_string(), places);
        self
    }

    pub fn with_search_failure(mut self, coordinate: &Coordinate, place_type: &str) -> Self {
        self.failing_searches
            .insert((coordinate.key_component(), place_type.to_string()));
        self
    }

    pub fn with_search_delay(mut self, coordinate: &Coordinate, delay: Duration) -> Self {
        self.search_delays.insert(coordinate.key_component(), delay);
        self
    }

    /// Latency applied to every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_geocode_calls(&self) -> usize {
        self.reverse_geocode_calls.load(Ordering::SeqCst)
    }

    pub fn nearby_calls(&self) -> usize {
        self.nearby_calls.load(Ordering::SeqCst)
    }

    pub fn distance_matrix_calls(&self) -> usize {
        self.distance_matrix_calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, extra_delay: Option<Duration>) -> InFlightGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlightGuard(&self.in_flight);

        let delay = self.latency + extra_delay.unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        guard
    }
}

#[async_trait]
impl PlacesProvider for FakePlacesProvider {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, DomainError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        let key = address_key(address);
        let _guard = self.enter(self.geocode_delays.get(&key).copied()).await;

        if self.failing_addresses.contains(&key) {
            return Err(DomainError::upstream("geocode", format!("scripted failure for {}", address)));
        }

        Ok(self
            .geocodes
            .get(&key)
            .map(|coordinate| GeocodeResult {
                coordinate: *coordinate,
                formatted_address: address.trim().to_string(),
                place_id: None,
            })
            .into_iter()
            .collect())
    }

    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<ReverseGeocodeResult>, DomainError> {
        self.reverse_geocode_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = self.enter(None).await;

        Ok(vec![ReverseGeocodeResult {
            coordinate,
            formatted_address: format!("Somewhere near {}", coordinate.key_component()),
            place_id: Some(format!("rev-{}", coordinate.key_component())),
            address_components: Vec::new(),
        }])
    }

    async fn nearby_search(&self, request: NearbyRequest) -> Result<Vec<RawPlace>, DomainError> {
        self.nearby_calls.fetch_add(1, Ordering::SeqCst);
        let coordinate_key = request.coordinate.key_component();
        let _guard = self
            .enter(self.search_delays.get(&coordinate_key).copied())
            .await;

        if self
            .failing_searches
            .contains(&(coordinate_key, request.place_type.clone()))
        {
            return Err(DomainError::upstream(
                "nearby_search",
                format!("scripted failure for {}", request.place_type),
            ));
        }

        let mut places = self
            .places
            .get(&request.place_type)
            .cloned()
            .unwrap_or_default();
        places.truncate(request.max_results as usize);
        Ok(places)
    }

    async fn distance_matrix(
        &self,
        origins: Vec<String>,
        destinations: Vec<String>,
        mode: TravelMode,
    ) -> Result<DistanceMatrix, DomainError> {
        self.distance_matrix_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = self.enter(None).await;

        let rows = origins
            .iter()
            .enumerate()
            .map(|(i, _)| DistanceMatrixRow {
                elements: destinations
                    .iter()
                    .enumerate()
                    .map(|(j, _)| DistanceMatrixElement {
                        status: "OK".to_string(),
                        distance_meters: Some(1000 * (i as u64 + j as u64 + 1)),
                        duration_seconds: Some(60 * (i as u64 + j as u64 + 1)),
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
        "fake"
    }
}

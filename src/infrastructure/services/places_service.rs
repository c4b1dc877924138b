//! Cached, rate-limited access to the upstream places provider

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::domain::cache::{CacheKeyParams, CacheOperation};
use crate::domain::place::{
    normalize_place_type, DistanceMatrix, GeocodeResult, PlaceRecord, ReverseGeocodeResult,
    TravelMode,
};
use crate::domain::search::PROVIDER_MAX_PAGE_SIZE;
use crate::domain::{Coordinate, DomainError, NearbyRequest, PlacesProvider};
use crate::infrastructure::cache::{CacheStats, GeoCache};
use crate::infrastructure::observability::{record_upstream_call, UpstreamCallMetricParams};

/// Concurrency and timeout settings of the adapter
#[derive(Debug, Clone)]
pub struct PlacesServiceConfig {
    /// Upstream calls allowed in flight at once
    pub max_concurrent: usize,
    pub geocode_timeout: Duration,
    pub places_timeout: Duration,
    pub distance_matrix_timeout: Duration,
}

impl Default for PlacesServiceConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            geocode_timeout: Duration::from_secs(10),
            places_timeout: Duration::from_secs(30),
            distance_matrix_timeout: Duration::from_secs(30),
        }
    }
}

impl PlacesServiceConfig {
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Applies the same timeout to every operation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.geocode_timeout = timeout;
        self.places_timeout = timeout;
        self.distance_matrix_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_concurrent == 0 {
            return Err(DomainError::configuration(
                "max_concurrent must be greater than zero",
            ));
        }

        let timeouts = [
            self.geocode_timeout,
            self.places_timeout,
            self.distance_matrix_timeout,
        ];
        if timeouts.iter().any(Duration::is_zero) {
            return Err(DomainError::configuration(
                "Upstream timeouts must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Upstream client adapter
///
/// Every provider call goes through one shared semaphore and bumps the call
/// counter. Geocoding results live in the stable cache tier, nearby searches
/// in the volatile one.
#[derive(Clone)]
pub struct PlacesService {
    provider: Arc<dyn PlacesProvider>,
    provider_name: &'static str,
    cache: GeoCache,
    limiter: Arc<Semaphore>,
    call_count: Arc<AtomicU64>,
    config: PlacesServiceConfig,
}

impl fmt::Debug for PlacesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesService")
            .field("provider", &self.provider_name)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .field("call_count", &self.call_count())
            .finish_non_exhaustive()
    }
}

impl PlacesService {
    pub fn new(
        provider: Arc<dyn PlacesProvider>,
        cache: GeoCache,
        config: PlacesServiceConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        Ok(Self {
            provider_name: provider.provider_name(),
            provider,
            cache,
            limiter: Arc::new(Semaphore::new(config.max_concurrent)),
            call_count: Arc::new(AtomicU64::new(0)),
            config,
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Total upstream calls issued since creation or the last reset
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Runs one provider call under the limiter and a timeout
    async fn call_upstream<T, F>(
        &self,
        operation: &'static str,
        timeout: Duration,
        call: F,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| DomainError::internal("Upstream rate limiter is closed"))?;

        self.call_count.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();

        let result = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result.map_err(|e| e.into_upstream(operation)),
            Err(_) => Err(DomainError::upstream(
                operation,
                format!("timed out after {}ms", timeout.as_millis()),
            )),
        };

        record_upstream_call(UpstreamCallMetricParams {
            provider: self.provider_name,
            operation,
            duration: started.elapsed(),
            success: result.is_ok(),
        });

        if let Err(e) = &result {
            warn!(operation, error = %e, "Upstream call failed");
        }

        result
    }

    /// Resolves an address to its best match
    #[instrument(skip(self))]
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult, DomainError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DomainError::validation("Address must not be empty"));
        }

        let params = CacheKeyParams::new(CacheOperation::Geocode).with_address(address);
        if let Some(hit) = self.cache.get::<GeocodeResult>(&params).await {
            return Ok(hit);
        }

        let result = self
            .call_upstream(
                "geocode",
                self.config.geocode_timeout,
                self.provider.geocode(address),
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found(format!("Address not found: {}", address)))?;

        self.cache.set(&params, &result).await;
        Ok(result)
    }

    /// Resolves a coordinate to its most specific address
    #[instrument(skip(self, coordinate), fields(coordinate = %coordinate))]
    pub async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<ReverseGeocodeResult, DomainError> {
        let params =
            CacheKeyParams::new(CacheOperation::ReverseGeocode).with_coordinate(&coordinate);
        if let Some(hit) = self.cache.get::<ReverseGeocodeResult>(&params).await {
            return Ok(hit);
        }

        let result = self
            .call_upstream(
                "reverse_geocode",
                self.config.geocode_timeout,
                self.provider.reverse_geocode(coordinate),
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "No address found for coordinates: ({}, {})",
                    coordinate.lat(),
                    coordinate.lng()
                ))
            })?;

        self.cache.set(&params, &result).await;
        Ok(result)
    }

    /// Places of `category` near `coordinate`, nearest first, at most `max_results`
    ///
    /// The cache key leaves out `max_results`: a full provider page is fetched
    /// and cached, and smaller requests are served by truncation.
    #[instrument(skip(self, coordinate), fields(coordinate = %coordinate))]
    pub async fn nearby_search(
        &self,
        coordinate: Coordinate,
        category: &str,
        radius_meters: u32,
        max_results: u32,
    ) -> Result<Vec<PlaceRecord>, DomainError> {
        let place_type = normalize_place_type(category);
        let params = CacheKeyParams::new(CacheOperation::NearbySearch)
            .with_coordinate(&coordinate)
            .with_component(&place_type)
            .with_component(radius_meters);

        let mut places = match self.cache.get::<Vec<PlaceRecord>>(&params).await {
            Some(hit) => hit,
            None => {
                let request = NearbyRequest {
                    coordinate,
                    place_type: place_type.clone(),
                    radius_meters,
                    max_results: PROVIDER_MAX_PAGE_SIZE,
                };

                let raw = self
                    .call_upstream(
                        "nearby_search",
                        self.config.places_timeout,
                        self.provider.nearby_search(request),
                    )
                    .await?;

                let mut places: Vec<PlaceRecord> = raw
                    .into_iter()
                    .map(|place| place.into_record(&coordinate))
                    .collect();
                places.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));

                debug!(place_type = %place_type, found = places.len(), "Caching nearby search");
                self.cache.set(&params, &places).await;
                places
            }
        };

        places.truncate(max_results as usize);
        Ok(places)
    }

    /// Distance and duration for every origin/destination pair in one call
    #[instrument(skip(self, origins, destinations), fields(origins = origins.len(), destinations = destinations.len()))]
    pub async fn distance_matrix(
        &self,
        origins: Vec<String>,
        destinations: Vec<String>,
        mode: TravelMode,
    ) -> Result<DistanceMatrix, DomainError> {
        if origins.is_empty() || destinations.is_empty() {
            return Err(DomainError::validation(
                "At least one origin and one destination are required",
            ));
        }

        self.call_upstream(
            "distance_matrix",
            self.config.distance_matrix_timeout,
            self.provider.distance_matrix(origins, destinations, mode),
        )
        .await
    }
}

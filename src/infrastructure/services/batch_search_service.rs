//! Batch orchestrator: many locations crossed with many place types

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use super::places_service::PlacesService;
use crate::domain::place::{validate_place_types, GeocodeResult, PlaceRecord, ReverseGeocodeResult};
use crate::domain::search::{
    clean_categories, BatchSearchResponse, BatchSummary, LocationResult, LocationStatus,
    LookupBatchResponse, LookupOutcome, SearchOptions, SearchResponse,
};
use crate::domain::{Coordinate, DomainError, LocationQuery};
use crate::infrastructure::observability::record_batch;

/// A location after the resolve phase
#[derive(Debug, Clone)]
struct ResolvedLocation {
    coordinate: Coordinate,
    formatted_address: Option<String>,
}

/// Drives the resolve and search phases of a batch over a shared adapter
///
/// Per-location and per-category failures end up in the results. Only invalid
/// options or an empty category list are returned as errors.
#[derive(Debug, Clone)]
pub struct BatchSearchService {
    places: Arc<PlacesService>,
}

impl BatchSearchService {
    pub fn new(places: Arc<PlacesService>) -> Self {
        Self { places }
    }

    pub fn places(&self) -> &PlacesService {
        &self.places
    }

    /// Searches around a single location
    pub async fn search(
        &self,
        location: &LocationQuery,
        categories: &[String],
        options: &SearchOptions,
    ) -> Result<SearchResponse, DomainError> {
        let response = self
            .batch_search(std::slice::from_ref(location), categories, options)
            .await?;

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::internal("Single search produced no result"))?;

        Ok(SearchResponse {
            result,
            warnings: response.warnings,
            suggestions: response.suggestions,
        })
    }

    /// Searches every category around every location
    ///
    /// Results come back in input order whatever order the upstream calls
    /// complete in.
    #[instrument(skip_all, fields(locations = locations.len(), categories = categories.len()))]
    pub async fn batch_search(
        &self,
        locations: &[LocationQuery],
        categories: &[String],
        options: &SearchOptions,
    ) -> Result<BatchSearchResponse, DomainError> {
        options.validate()?;
        let categories = clean_categories(categories)?;
        let validation = validate_place_types(&categories);

        let calls_before = self.places.call_count();
        let hits_before = self.places.cache().total_hits();

        info!(
            locations = locations.len(),
            place_types = validation.valid.len(),
            invalid = validation.invalid.len(),
            "Starting batch search"
        );

        let results = if validation.valid.is_empty() {
            let message = format!(
                "No valid place types provided: {}",
                validation.invalid.join(", ")
            );
            warn!(%message, "Skipping batch search");

            locations
                .iter()
                .enumerate()
                .map(|(index, query)| {
                    LocationResult::failed(index, query.clone(), query.as_coordinate(), message.clone())
                })
                .collect()
        } else {
            self.run(locations, &validation.valid, options).await
        };

        let summary = BatchSummary::from_results(
            &results,
            self.places.call_count().saturating_sub(calls_before),
            self.places.cache().total_hits().saturating_sub(hits_before),
        );
        record_batch(&summary);

        info!(
            successful = summary.successful,
            partial = summary.partial,
            failed = summary.failed,
            places = summary.total_places_found,
            upstream_calls = summary.upstream_calls,
            cache_hits = summary.cache_hits,
            "Batch search finished"
        );

        Ok(BatchSearchResponse {
            results,
            summary,
            warnings: validation.warnings(),
            suggestions: validation.suggestions,
        })
    }

    async fn run(
        &self,
        locations: &[LocationQuery],
        place_types: &[String],
        options: &SearchOptions,
    ) -> Vec<LocationResult> {
        let resolved = join_all(locations.iter().map(|query| self.resolve(query))).await;

        let pairs: Vec<(usize, Coordinate, &str)> = resolved
            .iter()
            .enumerate()
            .filter_map(|(index, r)| r.as_ref().ok().map(|loc| (index, loc.coordinate)))
            .flat_map(|(index, coordinate)| {
                place_types
                    .iter()
                    .map(move |place_type| (index, coordinate, place_type.as_str()))
            })
            .collect();

        let outcomes = join_all(pairs.iter().map(|&(index, coordinate, place_type)| async move {
            let outcome = self
                .places
                .nearby_search(
                    coordinate,
                    place_type,
                    options.radius_meters,
                    options.max_results_per_category,
                )
                .await;
            (index, place_type, outcome)
        }))
        .await;

        let mut per_location: Vec<Vec<(&str, Result<Vec<PlaceRecord>, DomainError>)>> =
            locations.iter().map(|_| Vec::new()).collect();
        for (index, place_type, outcome) in outcomes {
            per_location[index].push((place_type, outcome));
        }

        locations
            .iter()
            .zip(resolved)
            .zip(per_location)
            .enumerate()
            .map(|(index, ((query, resolved), searches))| match resolved {
                Ok(location) => assemble(index, query, location, searches, options),
                Err(e) => {
                    log_item_failure(&e, index, "Location could not be resolved");
                    LocationResult::failed(index, query.clone(), None, e.to_string())
                }
            })
            .collect()
    }

    async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedLocation, DomainError> {
        match query {
            LocationQuery::Coordinate(coordinate) => Ok(ResolvedLocation {
                coordinate: *coordinate,
                formatted_address: None,
            }),
            LocationQuery::Address(address) => {
                let geocoded = self.places.geocode(address).await?;
                Ok(ResolvedLocation {
                    coordinate: geocoded.coordinate,
                    formatted_address: Some(geocoded.formatted_address),
                })
            }
        }
    }

    /// Geocodes every address concurrently, one outcome per input
    #[instrument(skip_all, fields(addresses = addresses.len()))]
    pub async fn geocode_batch(
        &self,
        addresses: Vec<String>,
    ) -> LookupBatchResponse<String, GeocodeResult> {
        let outcomes = join_all(addresses.iter().map(|address| self.places.geocode(address))).await;

        LookupBatchResponse::new(
            addresses
                .into_iter()
                .zip(outcomes)
                .enumerate()
                .map(|(index, (input, outcome))| lookup_outcome(index, input, outcome))
                .collect(),
        )
    }

    /// Reverse geocodes every coordinate concurrently, one outcome per input
    #[instrument(skip_all, fields(coordinates = coordinates.len()))]
    pub async fn reverse_geocode_batch(
        &self,
        coordinates: Vec<Coordinate>,
    ) -> LookupBatchResponse<Coordinate, ReverseGeocodeResult> {
        let outcomes = join_all(
            coordinates
                .iter()
                .map(|coordinate| self.places.reverse_geocode(*coordinate)),
        )
        .await;

        LookupBatchResponse::new(
            coordinates
                .into_iter()
                .zip(outcomes)
                .enumerate()
                .map(|(index, (input, outcome))| lookup_outcome(index, input, outcome))
                .collect(),
        )
    }
}

fn assemble(
    index: usize,
    query: &LocationQuery,
    location: ResolvedLocation,
    searches: Vec<(&str, Result<Vec<PlaceRecord>, DomainError>)>,
    options: &SearchOptions,
) -> LocationResult {
    let include_fields = options.include_fields.as_deref();
    let mut features = BTreeMap::new();
    let mut per_category_errors = Vec::new();

    for (place_type, outcome) in searches {
        match outcome {
            Ok(places) => {
                let places = places
                    .into_iter()
                    .map(|place| place.retain_fields(include_fields))
                    .collect();
                features.insert(place_type.to_string(), places);
            }
            Err(e) => {
                log_item_failure(&e, index, "Place search failed");
                per_category_errors.push(format!("{}: {}", place_type, e));
            }
        }
    }

    let status = LocationStatus::classify(features.len(), per_category_errors.len());
    let error = (status == LocationStatus::Error)
        .then(|| "All place searches failed".to_string());

    LocationResult {
        location_index: index,
        original_query: query.clone(),
        resolved_coordinate: Some(location.coordinate),
        formatted_address: location.formatted_address,
        features,
        per_category_errors,
        error,
        status,
    }
}

fn lookup_outcome<I, T>(index: usize, input: I, outcome: Result<T, DomainError>) -> LookupOutcome<I, T> {
    match outcome {
        Ok(result) => LookupOutcome::Success { index, input, result },
        Err(e) => {
            log_item_failure(&e, index, "Lookup failed");
            LookupOutcome::Error {
                index,
                input,
                error: e.to_string(),
            }
        }
    }
}

fn log_item_failure(e: &DomainError, index: usize, message: &str) {
    if e.is_per_item() {
        warn!(location_index = index, error = %e, "{}", message);
    } else {
        error!(location_index = index, error = %e, "{}", message);
    }
}

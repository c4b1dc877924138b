//! Batch Nearby Search
//!
//! Finds places of given types around many locations at once:
//! - Addresses and coordinates resolved concurrently, failures kept per location
//! - Two-tier cache (LRU geocoding, LRU + TTL place searches)
//! - One shared limit on concurrent upstream calls, with a call counter
//! - Google Maps Geocoding, Places (New) and Distance Matrix

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{DomainError, PlacesProvider};
use infrastructure::cache::GeoCache;
use infrastructure::google::{GoogleMapsProvider, HttpClient};
use infrastructure::services::{BatchSearchService, PlacesService};
use tracing::info;

/// Services shared by every command
#[derive(Debug, Clone)]
pub struct AppState {
    pub places: Arc<PlacesService>,
    pub search: BatchSearchService,
}

/// Builds the services against Google Maps
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let provider = GoogleMapsProvider::with_base_urls(
        HttpClient::new(),
        config.api_key()?,
        config.google.maps_base_url.as_str(),
        config.google.places_base_url.as_str(),
    );

    create_app_state_with_provider(config, Arc::new(provider))
}

/// Builds the services over any provider
pub fn create_app_state_with_provider(
    config: &AppConfig,
    provider: Arc<dyn PlacesProvider>,
) -> Result<AppState, DomainError> {
    let cache = GeoCache::new(&config.cache_config())?;
    let places = Arc::new(PlacesService::new(
        provider,
        cache,
        config.places_service_config(),
    )?);

    info!(
        provider = places.provider_name(),
        max_concurrent = config.upstream.max_concurrent,
        "Places service ready"
    );

    Ok(AppState {
        search: BatchSearchService::new(Arc::clone(&places)),
        places,
    })
}

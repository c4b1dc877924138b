//! Google Maps Platform provider

mod http_client;
mod provider;

pub use http_client::{HttpClient, HttpClientTrait};
pub use provider::{GoogleMapsProvider, DEFAULT_MAPS_BASE_URL, DEFAULT_PLACES_BASE_URL};

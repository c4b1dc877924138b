//! Infrastructure services

mod batch_search_service;
mod places_service;

pub use batch_search_service::BatchSearchService;
pub use places_service::{PlacesService, PlacesServiceConfig};

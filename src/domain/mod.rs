//! Domain layer - Core types, ports and rules

pub mod cache;
pub mod error;
pub mod geo;
pub mod place;
pub mod provider;
pub mod search;

pub use cache::{Cache, CacheExt, CacheKey, CacheKeyParams, CacheOperation, CacheTier};
pub use error::DomainError;
pub use geo::{haversine_distance, Coordinate, LocationInput, LocationQuery};
pub use place::{
    DistanceMatrix, DistanceMatrixEntry, GeocodeResult, PlaceField, PlaceRecord,
    PlaceTypeValidation, ReverseGeocodeResult, TravelMode,
};
pub use provider::{NearbyRequest, PlacesProvider, RawPlace};
pub use search::{
    BatchSearchRequest, BatchSearchResponse, BatchSummary, LocationResult, LocationStatus,
    LookupBatchResponse, LookupOutcome, SearchOptions, SearchResponse,
};

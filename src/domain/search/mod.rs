//! Search request and result model

mod model;
mod request;

pub use model::{
    BatchSearchResponse, BatchSummary, LocationResult, LocationStatus, LookupBatchResponse,
    LookupOutcome, LookupSummary, SearchResponse,
};
pub use request::{
    clean_categories, BatchSearchRequest, SearchOptions, DEFAULT_MAX_RESULTS_PER_CATEGORY,
    DEFAULT_RADIUS_METERS, MAX_BATCH_LOCATIONS, MAX_RADIUS_METERS, MAX_REQUEST_CATEGORIES,
    MIN_RADIUS_METERS, PROVIDER_MAX_PAGE_SIZE,
};

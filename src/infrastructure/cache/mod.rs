//! Cache infrastructure - moka tiers and the two-tier cache context

mod in_memory;
mod layer;

pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use layer::{CacheStats, GeoCache, GeoCacheConfig, TierStats};

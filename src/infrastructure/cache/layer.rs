//! Two-tier cache shared by the upstream adapter

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use crate::domain::cache::{Cache, CacheExt, CacheKeyParams, CacheTier};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_cache_lookup;

/// Capacities and expiry for both tiers
#[derive(Debug, Clone)]
pub struct GeoCacheConfig {
    pub stable_capacity: u64,
    pub volatile_capacity: u64,
    pub volatile_ttl: Duration,
}

impl Default for GeoCacheConfig {
    fn default() -> Self {
        Self {
            stable_capacity: 1_000,
            volatile_capacity: 500,
            volatile_ttl: Duration::from_secs(3600),
        }
    }
}

impl GeoCacheConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.stable_capacity == 0 || self.volatile_capacity == 0 {
            return Err(DomainError::configuration(
                "Cache capacities must be greater than zero",
            ));
        }
        if self.volatile_ttl.is_zero() {
            return Err(DomainError::configuration(
                "Places cache TTL must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TierCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TierCounters {
    fn reset(&self) {
        self.hits.store(0, Ordering::SeqCst);
        self.misses.store(0, Ordering::SeqCst);
    }
}

/// Hit/miss counters and size of one tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: usize,
}

impl TierStats {
    fn new(hits: u64, misses: u64, entries: usize) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        Self {
            hits,
            misses,
            hit_rate,
            entries,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub stable: TierStats,
    pub volatile: TierStats,
}

impl CacheStats {
    pub fn total_hits(&self) -> u64 {
        self.stable.hits + self.volatile.hits
    }
}

/// Stable (LRU) and volatile (LRU + TTL) caches with per-tier counters
///
/// Lookups never fail: a backend error or an undecodable entry counts as a miss.
#[derive(Debug, Clone)]
pub struct GeoCache {
    stable: Arc<dyn Cache>,
    volatile: Arc<dyn Cache>,
    stable_counters: Arc<TierCounters>,
    volatile_counters: Arc<TierCounters>,
}

impl GeoCache {
    pub fn new(config: &GeoCacheConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let stable = InMemoryCache::with_config(
            InMemoryCacheConfig::default().with_max_capacity(config.stable_capacity),
        );
        let volatile = InMemoryCache::with_config(
            InMemoryCacheConfig::default()
                .with_max_capacity(config.volatile_capacity)
                .with_time_to_live(config.volatile_ttl),
        );

        Ok(Self::with_backends(Arc::new(stable), Arc::new(volatile)))
    }

    /// Builds a cache over arbitrary backends
    pub fn with_backends(stable: Arc<dyn Cache>, volatile: Arc<dyn Cache>) -> Self {
        Self {
            stable,
            volatile,
            stable_counters: Arc::default(),
            volatile_counters: Arc::default(),
        }
    }

    fn tier(&self, tier: CacheTier) -> (&Arc<dyn Cache>, &TierCounters) {
        match tier {
            CacheTier::Stable => (&self.stable, &self.stable_counters),
            CacheTier::Volatile => (&self.volatile, &self.volatile_counters),
        }
    }

    /// Looks up a value, counting a hit or a miss on its tier
    pub async fn get<V>(&self, params: &CacheKeyParams) -> Option<V>
    where
        V: DeserializeOwned + Send,
    {
        let tier = params.tier();
        let (cache, counters) = self.tier(tier);
        let key = params.key();

        let value = match cache.get::<V>(key.as_str()).await {
            Ok(value) => value,
            Err(e) => {
                warn!(tier = tier.as_str(), operation = params.operation.tag(), error = %e, "Cache read failed");
                None
            }
        };

        if value.is_some() {
            counters.hits.fetch_add(1, Ordering::SeqCst);
            debug!(tier = tier.as_str(), operation = params.operation.tag(), "Cache hit");
        } else {
            counters.misses.fetch_add(1, Ordering::SeqCst);
            debug!(tier = tier.as_str(), operation = params.operation.tag(), "Cache miss");
        }
        record_cache_lookup(tier.as_str(), value.is_some());

        value
    }

    /// Stores a value; failures only degrade hit rate
    pub async fn set<V>(&self, params: &CacheKeyParams, value: &V)
    where
        V: Serialize + Send + Sync,
    {
        let tier = params.tier();
        let (cache, _) = self.tier(tier);
        let key = params.key();

        if let Err(e) = cache.set(key.as_str(), value).await {
            warn!(tier = tier.as_str(), operation = params.operation.tag(), error = %e, "Cache write failed");
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = |cache: &Arc<dyn Cache>| {
            let cache = Arc::clone(cache);
            async move { cache.size().await.unwrap_or(0) }
        };

        CacheStats {
            stable: TierStats::new(
                self.stable_counters.hits.load(Ordering::SeqCst),
                self.stable_counters.misses.load(Ordering::SeqCst),
                entries(&self.stable).await,
            ),
            volatile: TierStats::new(
                self.volatile_counters.hits.load(Ordering::SeqCst),
                self.volatile_counters.misses.load(Ordering::SeqCst),
                entries(&self.volatile).await,
            ),
        }
    }

    /// Hits across both tiers since the last reset
    pub fn total_hits(&self) -> u64 {
        self.stable_counters.hits.load(Ordering::SeqCst)
            + self.volatile_counters.hits.load(Ordering::SeqCst)
    }

    pub fn reset_stats(&self) {
        self.stable_counters.reset();
        self.volatile_counters.reset();
    }

    /// Empties both tiers and zeroes all counters
    pub async fn clear(&self) {
        for (tier, cache) in [(CacheTier::Stable, &self.stable), (CacheTier::Volatile, &self.volatile)] {
            if let Err(e) = cache.clear().await {
                warn!(tier = tier.as_str(), error = %e, "Cache clear failed");
            }
        }
        self.reset_stats();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheOperation, MockCache};
    use crate::domain::geo::Coordinate;

    fn geocode_params(address: &str) -> CacheKeyParams {
        CacheKeyParams::new(CacheOperation::Geocode).with_address(address)
    }

    fn places_params() -> CacheKeyParams {
        CacheKeyParams::new(CacheOperation::NearbySearch)
            .with_coordinate(&Coordinate::new(1.0, 2.0).unwrap())
            .with_component("park")
            .with_component(5000)
    }

    #[tokio::test]
    async fn test_hit_and_miss_counters_per_tier() {
        let cache = GeoCache::new(&GeoCacheConfig::default()).unwrap();

        assert!(cache.get::<String>(&geocode_params("Oslo")).await.is_none());
        cache.set(&geocode_params("Oslo"), &"59.9,10.7".to_string()).await;
        assert_eq!(
            cache.get::<String>(&geocode_params(" oslo ")).await,
            Some("59.9,10.7".to_string())
        );
        assert!(cache.get::<Vec<u32>>(&places_params()).await.is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.stable.hits, 1);
        assert_eq!(stats.stable.misses, 1);
        assert_eq!(stats.stable.hit_rate, 0.5);
        assert_eq!(stats.stable.entries, 1);
        assert_eq!(stats.volatile.hits, 0);
        assert_eq!(stats.volatile.misses, 1);
        assert_eq!(cache.total_hits(), 1);
    }

    #[tokio::test]
    async fn test_tiers_are_independent() {
        let cache = GeoCache::new(&GeoCacheConfig::default()).unwrap();
        cache.set(&places_params(), &vec![1u32, 2, 3]).await;

        let stats = cache.stats().await;
        assert_eq!(stats.stable.entries, 0);
        assert_eq!(stats.volatile.entries, 1);
    }

    #[tokio::test]
    async fn test_volatile_tier_expires() {
        let config = GeoCacheConfig {
            volatile_ttl: Duration::from_millis(50),
            ..Default::default()
        };
        let cache = GeoCache::new(&config).unwrap();

        cache.set(&places_params(), &vec![1u32]).await;
        cache.set(&geocode_params("Rome"), &"ok".to_string()).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get::<Vec<u32>>(&places_params()).await.is_none());
        assert!(cache.get::<String>(&geocode_params("Rome")).await.is_some());
    }

    #[tokio::test]
    async fn test_backend_errors_degrade_to_miss() {
        let cache = GeoCache::with_backends(
            Arc::new(MockCache::new().with_error("boom")),
            Arc::new(MockCache::new()),
        );

        cache.set(&geocode_params("Lima"), &"x".to_string()).await;
        assert!(cache.get::<String>(&geocode_params("Lima")).await.is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.stable.misses, 1);
        assert_eq!(stats.stable.entries, 0);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let key = geocode_params("Quito").key();
        let cache = GeoCache::with_backends(
            Arc::new(MockCache::new().with_raw_entry(key.as_str(), "{broken")),
            Arc::new(MockCache::new()),
        );

        assert!(cache.get::<String>(&geocode_params("Quito")).await.is_none());
        assert_eq!(cache.stats().await.stable.misses, 1);
    }

    #[tokio::test]
    async fn test_reset_and_clear() {
        let cache = GeoCache::new(&GeoCacheConfig::default()).unwrap();
        cache.set(&geocode_params("Doha"), &"x".to_string()).await;
        cache.get::<String>(&geocode_params("Doha")).await;

        cache.reset_stats();
        let stats = cache.stats().await;
        assert_eq!(stats.stable.hits, 0);
        assert_eq!(stats.stable.entries, 1);

        cache.get::<String>(&geocode_params("Doha")).await;
        cache.clear().await;
        let stats = cache.stats().await;
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = GeoCacheConfig {
            stable_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            GeoCache::new(&config),
            Err(DomainError::Configuration { .. })
        ));
    }
}

//! Cache key construction

use std::fmt;

use sha2::{Digest, Sha256};

use crate::domain::geo::Coordinate;

/// Which cache tier an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTier {
    /// Capacity-bounded LRU, no expiry
    Stable,
    /// Capacity-bounded with time-to-live
    Volatile,
}

impl CacheTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Volatile => "volatile",
        }
    }
}

/// Cacheable upstream operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    Geocode,
    ReverseGeocode,
    NearbySearch,
}

impl CacheOperation {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Geocode => "geocode",
            Self::ReverseGeocode => "reverse_geocode",
            Self::NearbySearch => "places",
        }
    }

    pub fn tier(&self) -> CacheTier {
        match self {
            Self::Geocode | Self::ReverseGeocode => CacheTier::Stable,
            Self::NearbySearch => CacheTier::Volatile,
        }
    }
}

/// Opaque SHA-256 hex digest identifying a cache entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized arguments of a cacheable call, in call order
#[derive(Debug, Clone)]
pub struct CacheKeyParams {
    pub operation: CacheOperation,
    pub components: Vec<String>,
}

impl CacheKeyParams {
    pub fn new(operation: CacheOperation) -> Self {
        Self {
            operation,
            components: Vec::new(),
        }
    }

    /// Addresses are case-folded and trimmed
    pub fn with_address(self, address: &str) -> Self {
        self.with_component(address.trim().to_lowercase())
    }

    /// Coordinates are rounded so that near-duplicates share an entry
    pub fn with_coordinate(self, coordinate: &Coordinate) -> Self {
        self.with_component(coordinate.key_component())
    }

    /// Appended verbatim
    pub fn with_component(mut self, value: impl fmt::Display) -> Self {
        self.components.push(value.to_string());
        self
    }

    pub fn tier(&self) -> CacheTier {
        self.operation.tier()
    }

    /// Digest of `tag|component|component...`
    pub fn key(&self) -> CacheKey {
        let mut parts = Vec::with_capacity(self.components.len() + 1);
        parts.push(self.operation.tag());
        parts.extend(self.components.iter().map(String::as_str));

        let digest = Sha256::digest(parts.join("|").as_bytes());
        CacheKey(hex::encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_fixed_length_hex() {
        let key = CacheKeyParams::new(CacheOperation::Geocode)
            .with_address("Berlin")
            .key();

        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_address_normalization() {
        let a = CacheKeyParams::new(CacheOperation::Geocode)
            .with_address("  1600 Amphitheatre Pkwy ")
            .key();
        let b = CacheKeyParams::new(CacheOperation::Geocode)
            .with_address("1600 AMPHITHEATRE PKWY")
            .key();

        assert_eq!(a, b);
    }

    #[test]
    fn test_operation_tag_separates_keys() {
        let coordinate = Coordinate::new(10.0, 20.0).unwrap();
        let reverse = CacheKeyParams::new(CacheOperation::ReverseGeocode)
            .with_coordinate(&coordinate)
            .key();
        let places = CacheKeyParams::new(CacheOperation::NearbySearch)
            .with_coordinate(&coordinate)
            .key();

        assert_ne!(reverse, places);
    }

    #[test]
    fn test_nearby_key_components() {
        let coordinate = Coordinate::new(37.42201, -122.08411).unwrap();
        let params = CacheKeyParams::new(CacheOperation::NearbySearch)
            .with_coordinate(&coordinate)
            .with_component("park")
            .with_component(5000u32);

        assert_eq!(params.components, vec!["37.4220,-122.0841", "park", "5000"]);
        assert_eq!(params.tier(), CacheTier::Volatile);

        let expected = hex::encode(Sha256::digest(b"places|37.4220,-122.0841|park|5000"));
        assert_eq!(params.key().as_str(), expected);
    }

    #[test]
    fn test_radius_is_verbatim() {
        let coordinate = Coordinate::new(1.0, 1.0).unwrap();
        let key = |radius: u32| {
            CacheKeyParams::new(CacheOperation::NearbySearch)
                .with_coordinate(&coordinate)
                .with_component("cafe")
                .with_component(radius)
                .key()
        };

        assert_ne!(key(1000), key(1001));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(CacheOperation::Geocode.tier(), CacheTier::Stable);
        assert_eq!(CacheOperation::ReverseGeocode.tier(), CacheTier::Stable);
        assert_eq!(CacheOperation::NearbySearch.tier(), CacheTier::Volatile);
    }
}

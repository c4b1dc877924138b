use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::geo::{Coordinate, LocationQuery};
use crate::domain::place::PlaceRecord;

/// Per-location outcome classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Success,
    Partial,
    Error,
}

impl LocationStatus {
    /// Classifies by how many categories succeeded and failed
    pub fn classify(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (0, _) => Self::Error,
            (_, 0) => Self::Success,
            _ => Self::Partial,
        }
    }
}

/// Results for one input location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub location_index: usize,
    pub original_query: LocationQuery,
    pub resolved_coordinate: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    /// Category -> places sorted by ascending distance
    pub features: BTreeMap<String, Vec<PlaceRecord>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub per_category_errors: Vec<String>,
    /// Location-level failure, e.g. geocoding or no usable categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: LocationStatus,
}

impl LocationResult {
    /// A location that never reached the search phase
    pub fn failed(
        location_index: usize,
        original_query: LocationQuery,
        resolved_coordinate: Option<Coordinate>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            location_index,
            original_query,
            resolved_coordinate,
            formatted_address: None,
            features: BTreeMap::new(),
            per_category_errors: Vec::new(),
            error: Some(error.into()),
            status: LocationStatus::Error,
        }
    }

    pub fn places_found(&self) -> usize {
        self.features.values().map(Vec::len).sum()
    }
}

/// Aggregate counts for a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_locations: usize,
    pub successful: usize,
    pub partial: usize,
    pub failed: usize,
    pub total_places_found: usize,
    /// Upstream calls issued while the batch ran
    pub upstream_calls: u64,
    /// Cache hits recorded while the batch ran
    pub cache_hits: u64,
}

impl BatchSummary {
    pub fn from_results(results: &[LocationResult], upstream_calls: u64, cache_hits: u64) -> Self {
        let count = |status: LocationStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            total_locations: results.len(),
            successful: count(LocationStatus::Success),
            partial: count(LocationStatus::Partial),
            failed: count(LocationStatus::Error),
            total_places_found: results.iter().map(LocationResult::places_found).sum(),
            upstream_calls,
            cache_hits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSearchResponse {
    pub results: Vec<LocationResult>,
    pub summary: BatchSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub suggestions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub result: LocationResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub suggestions: BTreeMap<String, Vec<String>>,
}

/// Outcome of one lookup in a batch geocode or reverse geocode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LookupOutcome<I, T> {
    Success { index: usize, input: I, result: T },
    Error { index: usize, input: I, error: String },
}

impl<I, T> LookupOutcome<I, T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Success { index, .. } | Self::Error { index, .. } => *index,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupBatchResponse<I, T> {
    pub results: Vec<LookupOutcome<I, T>>,
    pub summary: LookupSummary,
}

impl<I, T> LookupBatchResponse<I, T> {
    pub fn new(results: Vec<LookupOutcome<I, T>>) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        let summary = LookupSummary {
            total: results.len(),
            successful,
            failed: results.len() - successful,
        };

        Self { results, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(LocationStatus::classify(2, 0), LocationStatus::Success);
        assert_eq!(LocationStatus::classify(1, 1), LocationStatus::Partial);
        assert_eq!(LocationStatus::classify(0, 2), LocationStatus::Error);
        assert_eq!(LocationStatus::classify(0, 0), LocationStatus::Error);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&LocationStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }

    #[test]
    fn test_summary_from_results() {
        let query = LocationQuery::address("A").unwrap();
        let ok = LocationResult {
            location_index: 0,
            original_query: query.clone(),
            resolved_coordinate: None,
            formatted_address: None,
            features: BTreeMap::new(),
            per_category_errors: Vec::new(),
            error: None,
            status: LocationStatus::Success,
        };
        let failed = LocationResult::failed(1, query, None, "Address not found");

        let summary = BatchSummary::from_results(&[ok, failed], 4, 1);
        assert_eq!(summary.total_locations, 2);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.partial, 0);
        assert_eq!(summary.upstream_calls, 4);
        assert_eq!(summary.cache_hits, 1);
    }

    #[test]
    fn test_lookup_outcome_shape() {
        let outcome: LookupOutcome<String, u32> = LookupOutcome::Error {
            index: 0,
            input: "nowhere".to_string(),
            error: "Not found".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["input"], "nowhere");

        let response = LookupBatchResponse::new(vec![outcome]);
        assert_eq!(response.summary.failed, 1);
        assert_eq!(response.summary.successful, 0);
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::geo::LocationQuery;
use crate::domain::place::PlaceField;
use crate::domain::DomainError;

pub const MIN_RADIUS_METERS: u32 = 100;
pub const MAX_RADIUS_METERS: u32 = 50_000;
pub const DEFAULT_RADIUS_METERS: u32 = 5_000;

/// Provider page size; also the largest per-category result count
pub const PROVIDER_MAX_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MAX_RESULTS_PER_CATEGORY: u32 = 3;

pub const MAX_BATCH_LOCATIONS: usize = 20;
pub const MAX_REQUEST_CATEGORIES: usize = 10;

/// Knobs shared by single and batch searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub radius_meters: u32,
    pub max_results_per_category: u32,
    /// `None` keeps every optional place field
    pub include_fields: Option<Vec<PlaceField>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            max_results_per_category: DEFAULT_MAX_RESULTS_PER_CATEGORY,
            include_fields: None,
        }
    }
}

impl SearchOptions {
    pub fn new(radius_meters: u32, max_results_per_category: u32) -> Self {
        Self {
            radius_meters,
            max_results_per_category,
            include_fields: None,
        }
    }

    pub fn with_include_fields(mut self, fields: Vec<PlaceField>) -> Self {
        self.include_fields = Some(fields);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&self.radius_meters) {
            return Err(DomainError::validation(format!(
                "radius_meters must be between {} and {}, got {}",
                MIN_RADIUS_METERS, MAX_RADIUS_METERS, self.radius_meters
            )));
        }

        if !(1..=PROVIDER_MAX_PAGE_SIZE).contains(&self.max_results_per_category) {
            return Err(DomainError::validation(format!(
                "max_results_per_category must be between 1 and {}, got {}",
                PROVIDER_MAX_PAGE_SIZE, self.max_results_per_category
            )));
        }

        Ok(())
    }
}

/// Trims entries and drops blanks; nothing left is a validation error
pub fn clean_categories<S: AsRef<str>>(categories: &[S]) -> Result<Vec<String>, DomainError> {
    let cleaned: Vec<String> = categories
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if cleaned.is_empty() {
        return Err(DomainError::validation("At least one place type is required"));
    }

    Ok(cleaned)
}

/// Batch search as received at the request boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSearchRequest {
    pub locations: Vec<LocationQuery>,
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

impl BatchSearchRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.locations.len() > MAX_BATCH_LOCATIONS {
            return Err(DomainError::validation(format!(
                "At most {} locations per batch, got {}",
                MAX_BATCH_LOCATIONS,
                self.locations.len()
            )));
        }

        let categories = clean_categories(&self.categories)?;
        if categories.len() > MAX_REQUEST_CATEGORIES {
            return Err(DomainError::validation(format!(
                "At most {} place types per request, got {}",
                MAX_REQUEST_CATEGORIES,
                categories.len()
            )));
        }

        self.options.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(locations: usize, categories: &[&str]) -> BatchSearchRequest {
        BatchSearchRequest {
            locations: (0..locations)
                .map(|i| LocationQuery::coordinate(i as f64 * 0.1, 0.0).unwrap())
                .collect(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            options: SearchOptions::default(),
        }
    }

    #[test]
    fn test_default_options_are_valid() {
        assert!(SearchOptions::default().validate().is_ok());
    }

    #[test]
    fn test_radius_bounds() {
        assert!(SearchOptions::new(99, 3).validate().is_err());
        assert!(SearchOptions::new(100, 3).validate().is_ok());
        assert!(SearchOptions::new(50_000, 3).validate().is_ok());
        assert!(SearchOptions::new(50_001, 3).validate().is_err());
    }

    #[test]
    fn test_max_results_bounds() {
        assert!(SearchOptions::new(5000, 0).validate().is_err());
        assert!(SearchOptions::new(5000, 20).validate().is_ok());
        assert!(SearchOptions::new(5000, 21).validate().is_err());
    }

    #[test]
    fn test_clean_categories() {
        assert_eq!(clean_categories(&[" park ", "", "cafe"]).unwrap(), vec!["park", "cafe"]);
        assert!(clean_categories(&["  ", ""]).is_err());
        assert!(clean_categories::<&str>(&[]).is_err());
    }

    #[test]
    fn test_batch_request_limits() {
        assert!(request(0, &["park"]).validate().is_ok());
        assert!(request(20, &["park"]).validate().is_ok());
        assert!(request(21, &["park"]).validate().is_err());

        let eleven: Vec<&str> = std::iter::repeat("park").take(11).collect();
        assert!(request(1, &eleven).validate().is_err());
        assert!(request(1, &[]).validate().is_err());
    }

    #[test]
    fn test_batch_request_deserializes_with_defaults() {
        let json = r#"{
            "locations": [{"address": "Berlin"}, {"lat": 52.5, "lng": 13.4}],
            "categories": ["park"],
            "radius_meters": 1500,
            "max_results_per_category": 5
        }"#;

        let request: BatchSearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.locations.len(), 2);
        assert_eq!(request.options.radius_meters, 1500);
        assert!(request.options.include_fields.is_none());
        assert!(request.validate().is_ok());
    }
}

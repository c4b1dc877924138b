use std::time::Duration;

use serde::Deserialize;

use crate::domain::search::{SearchOptions, DEFAULT_MAX_RESULTS_PER_CATEGORY, DEFAULT_RADIUS_METERS};
use crate::domain::DomainError;
use crate::infrastructure::cache::GeoCacheConfig;
use crate::infrastructure::google::{DEFAULT_MAPS_BASE_URL, DEFAULT_PLACES_BASE_URL};
use crate::infrastructure::services::PlacesServiceConfig;

/// Environment variables read on top of the `APP__` layer, with the key each one sets
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GOOGLE_MAPS_API_KEY", "google.api_key"),
    ("MAX_CONCURRENT_REQUESTS", "upstream.max_concurrent"),
    ("GEOCODING_CACHE_SIZE", "cache.geocoding_capacity"),
    ("PLACES_CACHE_SIZE", "cache.places_capacity"),
    ("PLACES_CACHE_TTL", "cache.places_ttl_secs"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub google: GoogleConfig,
    pub cache: CacheConfig,
    pub upstream: UpstreamConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub maps_base_url: String,
    pub places_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub geocoding_capacity: u64,
    pub places_capacity: u64,
    pub places_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub max_concurrent: usize,
    pub geocode_timeout_secs: u64,
    pub places_timeout_secs: u64,
    pub distance_matrix_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_meters: u32,
    pub max_results_per_category: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            maps_base_url: DEFAULT_MAPS_BASE_URL.to_string(),
            places_base_url: DEFAULT_PLACES_BASE_URL.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            geocoding_capacity: 1_000,
            places_capacity: 500,
            places_ttl_secs: 3_600,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            geocode_timeout_secs: 10,
            places_timeout_secs: 30,
            distance_matrix_timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            max_results_per_category: DEFAULT_MAX_RESULTS_PER_CATEGORY,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Loads the layered configuration, reading legacy variables through `env`
    pub fn load_with<F>(env: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (variable, key) in LEGACY_ENV_OVERRIDES {
            let value = env(variable).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// The Google API key; a missing or blank key is fatal
    pub fn api_key(&self) -> Result<&str, DomainError> {
        self.google
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DomainError::configuration(
                    "Google Maps API key is not set (google.api_key or GOOGLE_MAPS_API_KEY)",
                )
            })
    }

    pub fn cache_config(&self) -> GeoCacheConfig {
        GeoCacheConfig {
            stable_capacity: self.cache.geocoding_capacity,
            volatile_capacity: self.cache.places_capacity,
            volatile_ttl: Duration::from_secs(self.cache.places_ttl_secs),
        }
    }

    pub fn places_service_config(&self) -> PlacesServiceConfig {
        PlacesServiceConfig {
            max_concurrent: self.upstream.max_concurrent,
            geocode_timeout: Duration::from_secs(self.upstream.geocode_timeout_secs),
            places_timeout: Duration::from_secs(self.upstream.places_timeout_secs),
            distance_matrix_timeout: Duration::from_secs(self.upstream.distance_matrix_timeout_secs),
        }
    }

    /// Default search options for requests that do not set their own
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::new(
            self.search.radius_meters,
            self.search.max_results_per_category,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::load_with(|name| vars.get(name).cloned()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.cache.geocoding_capacity, 1_000);
        assert_eq!(config.cache.places_capacity, 500);
        assert_eq!(config.cache.places_ttl_secs, 3_600);
        assert_eq!(config.upstream.max_concurrent, 10);
        assert_eq!(config.search.radius_meters, 5_000);
        assert_eq!(config.search.max_results_per_category, 3);
        assert_eq!(config.google.maps_base_url, "https://maps.googleapis.com");
        assert!(matches!(config.logging.format, LogFormat::Pretty));
    }

    #[test]
    fn test_legacy_env_overrides() {
        let config = load(&[
            ("GOOGLE_MAPS_API_KEY", "secret"),
            ("MAX_CONCURRENT_REQUESTS", "4"),
            ("GEOCODING_CACHE_SIZE", "50"),
            ("PLACES_CACHE_SIZE", "25"),
            ("PLACES_CACHE_TTL", "60"),
        ]);

        assert_eq!(config.api_key().unwrap(), "secret");
        assert_eq!(config.upstream.max_concurrent, 4);

        let cache = config.cache_config();
        assert_eq!(cache.stable_capacity, 50);
        assert_eq!(cache.volatile_capacity, 25);
        assert_eq!(cache.volatile_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_blank_legacy_values_are_ignored() {
        let config = load(&[("MAX_CONCURRENT_REQUESTS", " ")]);
        assert_eq!(config.upstream.max_concurrent, 10);
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.api_key(),
            Err(DomainError::Configuration { .. })
        ));

        config.google.api_key = Some("   ".to_string());
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_service_configs() {
        let config = AppConfig::default();

        let places = config.places_service_config();
        assert_eq!(places.max_concurrent, 10);
        assert_eq!(places.geocode_timeout, Duration::from_secs(10));
        assert_eq!(places.places_timeout, Duration::from_secs(30));
        assert!(places.validate().is_ok());

        let options = config.search_options();
        assert_eq!(options.radius_meters, 5_000);
        assert!(options.include_fields.is_none());
    }

    #[test]
    fn test_log_format_parsing() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert!(matches!(format, LogFormat::Json));
    }
}

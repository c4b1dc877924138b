//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, GoogleConfig, LogFormat, LoggingConfig, SearchConfig, UpstreamConfig,
};

//! Observability infrastructure - Metrics

mod metrics;

pub use metrics::{record_batch, record_cache_lookup, record_upstream_call, UpstreamCallMetricParams};

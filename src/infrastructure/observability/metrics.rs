//! Metrics recorded through the `metrics` facade
//!
//! No exporter is installed here; an embedding host can install any recorder.

use std::time::Duration;

use metrics::{counter, histogram};

use crate::domain::search::BatchSummary;

fn outcome_label(success: bool) -> &'static str {
    if success { "success" } else { "error" }
}

/// Parameters for upstream call metrics
pub struct UpstreamCallMetricParams<'a> {
    pub provider: &'a str,
    pub operation: &'a str,
    pub duration: Duration,
    pub success: bool,
}

/// Record one upstream provider call
pub fn record_upstream_call(params: UpstreamCallMetricParams) {
    let labels = [
        ("provider", params.provider.to_string()),
        ("operation", params.operation.to_string()),
        ("status", outcome_label(params.success).to_string()),
    ];

    counter!("places_upstream_calls_total", &labels).increment(1);
    histogram!("places_upstream_call_duration_seconds", &labels)
        .record(params.duration.as_secs_f64());
}

/// Record a cache lookup on a tier
pub fn record_cache_lookup(tier: &str, hit: bool) {
    let labels = [
        ("tier", tier.to_string()),
        ("outcome", if hit { "hit" } else { "miss" }.to_string()),
    ];

    counter!("places_cache_lookups_total", &labels).increment(1);
}

/// Record the per-status location counts of a finished batch
pub fn record_batch(summary: &BatchSummary) {
    for (status, count) in [
        ("success", summary.successful),
        ("partial", summary.partial),
        ("error", summary.failed),
    ] {
        counter!("places_batch_locations_total", "status" => status).increment(count as u64);
    }
    histogram!("places_batch_places_found").record(summary.total_places_found as f64);
}

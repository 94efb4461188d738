/// Prometheus metrics for the engagement service
use lazy_static::lazy_static;
use prometheus::{register_counter_vec_with_registry, CounterVec, Encoder, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    /// Relation toggles (labels: relation=like|subscription, state=on|off)
    pub static ref TOGGLES_TOTAL: CounterVec = register_counter_vec_with_registry!(
        "engagement_toggles_total",
        "Total relation toggle operations",
        &["relation", "state"],
        REGISTRY
    )
    .unwrap();

    /// Composed views (labels: view)
    pub static ref VIEWS_COMPOSED_TOTAL: CounterVec = register_counter_vec_with_registry!(
        "engagement_views_composed_total",
        "Total view compositions served",
        &["view"],
        REGISTRY
    )
    .unwrap();

    /// Best-effort side effects that failed (labels: effect)
    pub static ref SIDE_EFFECT_FAILURES_TOTAL: CounterVec = register_counter_vec_with_registry!(
        "engagement_side_effect_failures_total",
        "View-count / watch-history side effects that failed",
        &["effect"],
        REGISTRY
    )
    .unwrap();
}

pub fn record_toggle(relation: &str, now_present: bool) {
    let state = if now_present { "on" } else { "off" };
    TOGGLES_TOTAL.with_label_values(&[relation, state]).inc();
}

pub fn record_view_composed(view: &str) {
    VIEWS_COMPOSED_TOTAL.with_label_values(&[view]).inc();
}

pub fn record_side_effect_failure(effect: &str) {
    SIDE_EFFECT_FAILURES_TOTAL
        .with_label_values(&[effect])
        .inc();
}

/// Render the registry in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

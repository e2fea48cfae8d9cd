//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use std::time::Duration;

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Search pipeline
    pub static ref SEARCH_RUNS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("donation_hub_search_runs_total", "Total number of search pipeline runs"),
        &["status"]
    ).expect("metric can be created");
    pub static ref DONATION_POSTS_CREATED_TOTAL: IntCounter = IntCounter::new(
        "donation_hub_donation_posts_created_total",
        "Total number of donation posts created"
    ).expect("metric can be created");
    pub static ref PAGE_SCANS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("donation_hub_page_scans_total", "Total number of result pages scanned for jar links"),
        &["outcome"]
    ).expect("metric can be created");

    // Alert renderer
    pub static ref ALERT_RENDERS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("donation_hub_alert_renders_total", "Total number of alert renders"),
        &["outcome"]
    ).expect("metric can be created");

    // Upstream APIs
    pub static ref EXTERNAL_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "donation_hub_external_request_duration_seconds",
            "Outbound request duration in seconds"
        ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("donation_hub_errors_total", "Total number of errors returned to clients"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(SEARCH_RUNS_TOTAL.clone()))
        .expect("SEARCH_RUNS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(DONATION_POSTS_CREATED_TOTAL.clone()))
        .expect("DONATION_POSTS_CREATED_TOTAL can be registered");
    REGISTRY
        .register(Box::new(PAGE_SCANS_TOTAL.clone()))
        .expect("PAGE_SCANS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ALERT_RENDERS_TOTAL.clone()))
        .expect("ALERT_RENDERS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(EXTERNAL_REQUEST_DURATION_SECONDS.clone()))
        .expect("EXTERNAL_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

/// Record one outbound request to an upstream service.
pub fn observe_external_request(service: &str, status: &str, elapsed: Duration) {
    EXTERNAL_REQUEST_DURATION_SECONDS
        .with_label_values(&[service, status])
        .observe(elapsed.as_secs_f64());
}

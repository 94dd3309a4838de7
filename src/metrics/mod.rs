//! Prometheus metrics for the trigger engine.
//!
//! - Trigger metrics (calls by outcome)
//! - Dispatch metrics (sent, skipped, failed, latency by channel)
//! - Lifecycle event metrics
//! - Registry gauges (templates, providers, event subscribers)

mod helpers;

pub use helpers::{encode_metrics, DispatchMetrics, TriggerMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramVec,
    IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "ara_trigger";

lazy_static! {
    // ============================================================================
    // Trigger Metrics
    // ============================================================================

    /// Total trigger calls by outcome
    pub static ref TRIGGERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_triggers_total", METRIC_PREFIX),
        "Total trigger calls by outcome",
        &["outcome"]
    ).unwrap();

    // ============================================================================
    // Dispatch Metrics
    // ============================================================================

    /// Messages handed off to a provider
    pub static ref MESSAGES_SENT_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_messages_sent_total", METRIC_PREFIX),
        "Total messages handed off to a provider",
        &["channel"]
    ).unwrap();

    /// Messages skipped because no handler is registered for the channel
    pub static ref MESSAGES_SKIPPED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_messages_skipped_total", METRIC_PREFIX),
        "Total messages skipped for lack of a channel handler",
        &["channel"]
    ).unwrap();

    /// Failed sends
    pub static ref SEND_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_send_failures_total", METRIC_PREFIX),
        "Total channel send failures",
        &["channel"]
    ).unwrap();

    /// Time spent in a channel handler's send
    pub static ref SEND_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_send_latency_seconds", METRIC_PREFIX),
        "Channel send latency in seconds",
        &["channel"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    // ============================================================================
    // Lifecycle Event Metrics
    // ============================================================================

    /// Lifecycle events emitted
    pub static ref LIFECYCLE_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_lifecycle_events_total", METRIC_PREFIX),
        "Total lifecycle events emitted",
        &["event"]
    ).unwrap();

    // ============================================================================
    // Registry Metrics
    // ============================================================================

    /// Templates in the template store
    pub static ref TEMPLATES_REGISTERED: IntGauge = register_int_gauge!(
        format!("{}_templates_registered", METRIC_PREFIX),
        "Number of templates in the template store"
    ).unwrap();

    /// Providers in the provider store
    pub static ref PROVIDERS_REGISTERED: IntGauge = register_int_gauge!(
        format!("{}_providers_registered", METRIC_PREFIX),
        "Number of providers in the provider store"
    ).unwrap();

    /// Live lifecycle event subscribers
    pub static ref EVENT_SUBSCRIBERS: IntGauge = register_int_gauge!(
        format!("{}_event_subscribers", METRIC_PREFIX),
        "Number of lifecycle event broadcast subscribers"
    ).unwrap();
}

//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    LIFECYCLE_EVENTS_TOTAL, MESSAGES_SENT_TOTAL, MESSAGES_SKIPPED_TOTAL, SEND_FAILURES_TOTAL,
    SEND_LATENCY, TRIGGERS_TOTAL,
};
use crate::template::ChannelType;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording trigger call metrics
pub struct TriggerMetrics;

impl TriggerMetrics {
    /// Record a trigger call that dispatched its whole batch
    pub fn record_success() {
        TRIGGERS_TOTAL.with_label_values(&["success"]).inc();
    }

    /// Record a failed trigger call, labelled with the error kind
    pub fn record_failure(kind: &str) {
        TRIGGERS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record an emitted lifecycle event
    pub fn record_lifecycle_event(event: &str) {
        LIFECYCLE_EVENTS_TOTAL.with_label_values(&[event]).inc();
    }
}

/// Helper struct for recording per-channel dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a message handed off to its provider
    pub fn record_sent(channel: ChannelType, elapsed: Duration) {
        MESSAGES_SENT_TOTAL
            .with_label_values(&[channel.as_str()])
            .inc();
        SEND_LATENCY
            .with_label_values(&[channel.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Record a message skipped for lack of a handler
    pub fn record_skipped(channel: ChannelType) {
        MESSAGES_SKIPPED_TOTAL
            .with_label_values(&[channel.as_str()])
            .inc();
    }

    /// Record a failed send
    pub fn record_failed(channel: ChannelType, elapsed: Duration) {
        SEND_FAILURES_TOTAL
            .with_label_values(&[channel.as_str()])
            .inc();
        SEND_LATENCY
            .with_label_values(&[channel.as_str()])
            .observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_recorded_metrics() {
        DispatchMetrics::record_skipped(ChannelType::Chat);
        TriggerMetrics::record_lifecycle_event("pre:send");

        let output = encode_metrics().unwrap();
        assert!(output.contains("ara_trigger_messages_skipped_total"));
        assert!(output.contains("ara_trigger_lifecycle_events_total"));
    }
}

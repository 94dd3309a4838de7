//! Lifecycle events published around each dispatched message.
//!
//! The engine publishes to an `EventSink` supplied at construction.
//! Subscribers (audit, analytics, logging) attach to the sink, never to the
//! engine itself.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::template::{ChannelType, Message, TriggerPayload};

/// The two points at which a lifecycle event is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleEventKind {
    #[serde(rename = "pre:send")]
    PreSend,
    #[serde(rename = "post:send")]
    PostSend,
}

impl LifecycleEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEventKind::PreSend => "pre:send",
            LifecycleEventKind::PostSend => "post:send",
        }
    }
}

impl fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one dispatch step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    pub kind: LifecycleEventKind,
    /// Identifies the trigger call this event belongs to
    pub trigger_id: Uuid,
    /// Template (event) identifier
    pub id: String,
    pub channel: ChannelType,
    pub message: Message,
    pub trigger_payload: TriggerPayload,
    pub emitted_at: DateTime<Utc>,
}

/// Receiver of lifecycle events.
///
/// `emit` is called inline by the engine, so implementations should hand
/// the event off quickly and must not fail.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &LifecycleEvent);
}

/// Publishes events on a tokio broadcast channel
pub struct BroadcastEventSink {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl BroadcastEventSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, event: &LifecycleEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event.clone());
    }
}

/// Writes one structured log line per event
#[derive(Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &LifecycleEvent) {
        tracing::info!(
            event = %event.kind,
            trigger_id = %event.trigger_id,
            template_id = %event.id,
            channel = %event.channel,
            "Lifecycle event"
        );
    }
}

/// Forwards every event to each contained sink, in order
#[derive(Default)]
pub struct FanoutEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutEventSink {
    fn emit(&self, event: &LifecycleEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

//! Trigger engine: event-to-template resolution and per-channel dispatch.
//!
//! For each `trigger(event_id, payload)` call the engine:
//! 1. resolves the template through the `TemplateStore`
//! 2. asks the store for the messages active for the payload
//! 3. for each message in order, resolves the channel's provider, emits
//!    `pre:send`, sends through the registered channel handler, and emits
//!    `post:send`
//!
//! The first failure aborts the rest of the batch.

mod engine;
mod error;
mod events;

pub use engine::{TriggerEngine, TriggerStats, TriggerStatsSnapshot};
pub use error::{TriggerError, TriggerResult};
pub use events::{
    BroadcastEventSink, EventSink, FanoutEventSink, LifecycleEvent, LifecycleEventKind,
    TracingEventSink,
};

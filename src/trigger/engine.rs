use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::handler::HandlerRegistry;
use crate::metrics::{DispatchMetrics, TriggerMetrics};
use crate::provider::ProviderStore;
use crate::template::{Message, Template, TemplateStore, TriggerPayload};

use super::error::{TriggerError, TriggerResult};
use super::events::{EventSink, LifecycleEvent, LifecycleEventKind};

/// Statistics for the trigger engine
#[derive(Debug, Default)]
pub struct TriggerStats {
    /// Trigger calls received
    pub triggers_total: AtomicU64,
    /// Trigger calls that returned an error
    pub triggers_failed: AtomicU64,
    /// Messages handed off to a provider
    pub messages_dispatched: AtomicU64,
    /// Messages whose provider channel had no handler
    pub messages_skipped: AtomicU64,
    /// Channel sends that failed
    pub send_failures: AtomicU64,
}

impl TriggerStats {
    pub fn snapshot(&self) -> TriggerStatsSnapshot {
        TriggerStatsSnapshot {
            triggers_total: self.triggers_total.load(Ordering::Relaxed),
            triggers_failed: self.triggers_failed.load(Ordering::Relaxed),
            messages_dispatched: self.messages_dispatched.load(Ordering::Relaxed),
            messages_skipped: self.messages_skipped.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of trigger engine statistics
#[derive(Debug, Clone, Serialize)]
pub struct TriggerStatsSnapshot {
    pub triggers_total: u64,
    pub triggers_failed: u64,
    pub messages_dispatched: u64,
    pub messages_skipped: u64,
    pub send_failures: u64,
}

/// State shared by every message of one trigger call
struct DispatchContext<'a> {
    trigger_id: Uuid,
    template: &'a Template,
    payload: &'a TriggerPayload,
}

/// Resolves events to templates and dispatches their active messages
pub struct TriggerEngine {
    template_store: Arc<dyn TemplateStore>,
    provider_store: Arc<dyn ProviderStore>,
    events: Arc<dyn EventSink>,
    handlers: HandlerRegistry,
    stats: TriggerStats,
}

impl TriggerEngine {
    /// Create an engine with the default email and SMS handlers
    pub fn new(
        template_store: Arc<dyn TemplateStore>,
        provider_store: Arc<dyn ProviderStore>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self::with_handlers(template_store, provider_store, events, HandlerRegistry::default())
    }

    /// Create an engine with a custom handler registry
    pub fn with_handlers(
        template_store: Arc<dyn TemplateStore>,
        provider_store: Arc<dyn ProviderStore>,
        events: Arc<dyn EventSink>,
        handlers: HandlerRegistry,
    ) -> Self {
        Self {
            template_store,
            provider_store,
            events,
            handlers,
            stats: TriggerStats::default(),
        }
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Get engine statistics
    pub fn stats(&self) -> TriggerStatsSnapshot {
        self.stats.snapshot()
    }

    /// Trigger the template registered for `event_id`.
    ///
    /// Active messages are dispatched one at a time in the order the
    /// template store returns them. The first failure aborts the remaining
    /// messages and is returned to the caller.
    pub async fn trigger(&self, event_id: &str, payload: &TriggerPayload) -> TriggerResult<()> {
        let trigger_id = Uuid::new_v4();
        self.stats.triggers_total.fetch_add(1, Ordering::Relaxed);

        let result = self.run(trigger_id, event_id, payload).await;

        match &result {
            Ok(()) => TriggerMetrics::record_success(),
            Err(e) => {
                self.stats.triggers_failed.fetch_add(1, Ordering::Relaxed);
                TriggerMetrics::record_failure(e.kind());
                tracing::warn!(
                    event_id = %event_id,
                    trigger_id = %trigger_id,
                    kind = e.kind(),
                    error = %e,
                    "Trigger failed"
                );
            }
        }

        result
    }

    #[tracing::instrument(
        name = "trigger.run",
        skip_all,
        fields(event_id = %event_id, trigger_id = %trigger_id)
    )]
    async fn run(
        &self,
        trigger_id: Uuid,
        event_id: &str,
        payload: &TriggerPayload,
    ) -> TriggerResult<()> {
        if event_id.is_empty() {
            return Err(TriggerError::TemplateNotFound(String::new()));
        }

        let template = self
            .template_store
            .get_template_by_id(event_id)
            .await?
            .ok_or_else(|| TriggerError::TemplateNotFound(event_id.to_string()))?;

        let messages = self
            .template_store
            .get_active_messages(&template, payload)
            .await?;

        if messages.is_empty() {
            tracing::debug!(template_id = %template.id, "No active messages for payload");
            return Ok(());
        }

        tracing::debug!(
            template_id = %template.id,
            active = messages.len(),
            "Dispatching active messages"
        );

        let ctx = DispatchContext {
            trigger_id,
            template: &template,
            payload,
        };

        for message in &messages {
            self.process_message(&ctx, message).await?;
        }

        Ok(())
    }

    async fn process_message(
        &self,
        ctx: &DispatchContext<'_>,
        message: &Message,
    ) -> TriggerResult<()> {
        let provider = self
            .provider_store
            .get_provider_by_channel(message.channel)
            .await?
            .ok_or(TriggerError::ProviderNotFound(message.channel))?;

        self.emit(ctx, LifecycleEventKind::PreSend, message);

        match self.handlers.resolve(message, provider.clone()) {
            Some(handler) => {
                let started = Instant::now();

                if let Err(source) = handler.send(ctx.payload).await {
                    DispatchMetrics::record_failed(message.channel, started.elapsed());
                    self.stats.send_failures.fetch_add(1, Ordering::Relaxed);
                    return Err(TriggerError::Send {
                        channel: message.channel,
                        source,
                    });
                }

                DispatchMetrics::record_sent(message.channel, started.elapsed());
                self.stats.messages_dispatched.fetch_add(1, Ordering::Relaxed);

                tracing::debug!(
                    template_id = %ctx.template.id,
                    channel = %message.channel,
                    provider_id = %provider.id(),
                    "Message dispatched"
                );
            }
            None => {
                // post:send is still emitted for skipped messages
                DispatchMetrics::record_skipped(provider.channel_type());
                self.stats.messages_skipped.fetch_add(1, Ordering::Relaxed);

                tracing::warn!(
                    template_id = %ctx.template.id,
                    channel = %message.channel,
                    provider_id = %provider.id(),
                    provider_channel = %provider.channel_type(),
                    "No handler registered for provider channel, skipping send"
                );
            }
        }

        self.emit(ctx, LifecycleEventKind::PostSend, message);

        Ok(())
    }

    fn emit(&self, ctx: &DispatchContext<'_>, kind: LifecycleEventKind, message: &Message) {
        let event = LifecycleEvent {
            kind,
            trigger_id: ctx.trigger_id,
            id: ctx.template.id.clone(),
            channel: message.channel,
            message: message.clone(),
            trigger_payload: ctx.payload.clone(),
            emitted_at: Utc::now(),
        };

        TriggerMetrics::record_lifecycle_event(kind.as_str());
        self.events.emit(&event);
    }
}

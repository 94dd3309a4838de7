use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::provider::{build_provider, InMemoryProviderStore};
use crate::template::InMemoryTemplateStore;
use crate::trigger::{BroadcastEventSink, FanoutEventSink, TracingEventSink, TriggerEngine};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub engine: Arc<TriggerEngine>,
    pub template_store: Arc<InMemoryTemplateStore>,
    pub provider_store: Arc<InMemoryProviderStore>,
    pub events: Arc<BroadcastEventSink>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the stores and engine from configuration.
    ///
    /// Fails if a configured template is invalid, a provider cannot be
    /// built, or two providers claim the same channel.
    pub fn new(settings: Settings) -> Result<Self> {
        let template_store = Arc::new(
            InMemoryTemplateStore::from_templates(settings.templates.iter().cloned())
                .context("Failed to load templates")?,
        );

        let provider_store = Arc::new(InMemoryProviderStore::new());
        for config in &settings.providers {
            let provider = build_provider(config)
                .with_context(|| format!("Failed to build provider '{}'", config.id))?;
            provider_store
                .register(provider)
                .with_context(|| format!("Failed to register provider '{}'", config.id))?;
        }

        let events = Arc::new(BroadcastEventSink::new(settings.events.broadcast_capacity));
        let mut sink = FanoutEventSink::new().with(events.clone());
        if settings.events.log_events {
            sink = sink.with(Arc::new(TracingEventSink));
        }

        let engine = Arc::new(TriggerEngine::new(
            template_store.clone(),
            provider_store.clone(),
            Arc::new(sink),
        ));

        tracing::info!(
            templates = template_store.count(),
            providers = provider_store.count(),
            "Trigger engine initialized"
        );

        Ok(Self {
            settings: Arc::new(settings),
            engine,
            template_store,
            provider_store,
            events,
            start_time: Instant::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderConfig, ProviderKind};
    use crate::template::{ChannelType, Message, Template};

    fn log_provider(id: &str, channel: ChannelType) -> ProviderConfig {
        ProviderConfig {
            id: id.to_string(),
            channel,
            kind: ProviderKind::Log,
            url: None,
            timeout_seconds: 10,
            from: None,
        }
    }

    #[test]
    fn test_state_from_settings() {
        let settings = Settings {
            templates: vec![Template::new(
                "welcome",
                vec![Message::new(ChannelType::Email, "Hello")],
            )],
            providers: vec![log_provider("mail", ChannelType::Email)],
            ..Default::default()
        };

        let state = AppState::new(settings).unwrap();
        assert_eq!(state.template_store.count(), 1);
        assert_eq!(state.provider_store.channels(), vec![ChannelType::Email]);
        assert_eq!(state.engine.stats().triggers_total, 0);
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let settings = Settings {
            providers: vec![
                log_provider("first", ChannelType::Sms),
                log_provider("second", ChannelType::Sms),
            ],
            ..Default::default()
        };

        assert!(AppState::new(settings).is_err());
    }

    #[test]
    fn test_invalid_template_rejected() {
        let settings = Settings {
            templates: vec![Template::new("welcome", Vec::new())],
            ..Default::default()
        };

        assert!(AppState::new(settings).is_err());
    }
}

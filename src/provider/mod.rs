//! Delivery providers and channel-to-provider lookup.
//!
//! A provider is scoped to one channel and exposes the delivery capability
//! for it (`EmailProvider`, `SmsProvider`). Implementations shipped here:
//!
//! - `LogProvider`: logs messages and succeeds (development)
//! - `WebhookProvider`: posts rendered messages as JSON to an HTTP endpoint
//!
//! Use `build_provider()` to create a provider from configuration.

mod log;
mod store;
mod types;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ProviderConfig, ProviderKind};

pub use log::LogProvider;
pub use store::{InMemoryProviderStore, ProviderStore};
pub use types::{
    EmailOptions, EmailProvider, Provider, ProviderError, ProviderResult, SmsOptions, SmsProvider,
};
pub use webhook::WebhookProvider;

/// Create a provider from configuration.
///
/// - `"webhook"`: Returns a `WebhookProvider`; requires `url`
/// - `"log"` (default): Returns a `LogProvider`
pub fn build_provider(config: &ProviderConfig) -> ProviderResult<Arc<dyn Provider>> {
    match config.kind {
        ProviderKind::Webhook => {
            let url = config.url.as_deref().ok_or_else(|| {
                ProviderError::InvalidConfig(format!(
                    "webhook provider {} requires a url",
                    config.id
                ))
            })?;

            tracing::info!(
                provider_id = %config.id,
                channel = %config.channel,
                kind = "webhook",
                url = %url,
                "Creating webhook provider"
            );

            let mut provider = WebhookProvider::new(
                config.id.clone(),
                config.channel,
                url,
                Duration::from_secs(config.timeout_seconds),
            )?;
            if let Some(from) = &config.from {
                provider = provider.with_from(from.clone());
            }

            Ok(Arc::new(provider))
        }
        ProviderKind::Log => {
            tracing::info!(
                provider_id = %config.id,
                channel = %config.channel,
                kind = "log",
                "Creating log provider"
            );
            Ok(Arc::new(LogProvider::new(config.id.clone(), config.channel)))
        }
    }
}

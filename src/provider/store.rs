//! Provider storage: channel-to-provider lookup

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::types::{Provider, ProviderError, ProviderResult};
use crate::template::ChannelType;

/// Lookup contract for provider storage backends
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Resolve a channel to its configured provider
    async fn get_provider_by_channel(
        &self,
        channel: ChannelType,
    ) -> ProviderResult<Option<Arc<dyn Provider>>>;
}

/// In-memory provider storage, one provider per channel
#[derive(Default)]
pub struct InMemoryProviderStore {
    providers: DashMap<ChannelType, Arc<dyn Provider>>,
}

impl InMemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for its channel.
    ///
    /// A channel resolves to exactly one provider; registering a second one
    /// for the same channel fails and keeps the first.
    pub fn register(&self, provider: Arc<dyn Provider>) -> ProviderResult<()> {
        let channel = provider.channel_type();

        match self.providers.entry(channel) {
            Entry::Occupied(_) => Err(ProviderError::AlreadyRegistered(channel)),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    provider_id = %provider.id(),
                    channel = %channel,
                    "Provider registered"
                );
                slot.insert(provider);
                Ok(())
            }
        }
    }

    /// Remove the provider for a channel, returning it
    pub fn remove(&self, channel: ChannelType) -> Option<Arc<dyn Provider>> {
        self.providers.remove(&channel).map(|(_, provider)| provider)
    }

    /// Channels that currently have a provider
    pub fn channels(&self) -> Vec<ChannelType> {
        let mut channels: Vec<_> = self.providers.iter().map(|entry| *entry.key()).collect();
        channels.sort_by_key(|c| c.as_str());
        channels
    }

    pub fn count(&self) -> usize {
        self.providers.len()
    }
}

#[async_trait]
impl ProviderStore for InMemoryProviderStore {
    async fn get_provider_by_channel(
        &self,
        channel: ChannelType,
    ) -> ProviderResult<Option<Arc<dyn Provider>>> {
        Ok(self.providers.get(&channel).map(|p| p.value().clone()))
    }
}

//! Channel handlers.
//!
//! A handler is built from one message and the provider resolved for it,
//! and sends that message with a trigger payload as substitution data.
//! Handlers are selected through a `HandlerRegistry` keyed by the
//! provider's channel; adding a channel means registering a factory.

mod email;
mod sms;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::provider::{Provider, ProviderError};
use crate::template::{ChannelType, Message, TriggerPayload};

pub use email::{EmailHandler, EMAIL_RECIPIENT_KEY};
pub use sms::{SmsHandler, SMS_RECIPIENT_KEY};

/// Errors raised while sending a message through a channel handler
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Payload has no `{0}` recipient field")]
    MissingRecipient(&'static str),

    #[error("Provider {provider_id} cannot deliver {expected} messages")]
    ProviderMismatch {
        provider_id: String,
        expected: ChannelType,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result type for handler operations
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Channel-specific delivery of a single message
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    fn channel(&self) -> ChannelType;

    /// Render the message with `payload` and hand it to the provider.
    ///
    /// Resolves once the provider accepted the message, not when it was
    /// delivered end-to-end.
    async fn send(&self, payload: &TriggerPayload) -> HandlerResult<()>;
}

/// Builds a handler from a message and its resolved provider
pub type HandlerFactory =
    Arc<dyn Fn(&Message, Arc<dyn Provider>) -> Box<dyn ChannelHandler> + Send + Sync>;

/// Mapping from channel to handler factory
#[derive(Clone)]
pub struct HandlerRegistry {
    factories: HashMap<ChannelType, HandlerFactory>,
}

impl Default for HandlerRegistry {
    /// Registry with the email and SMS handlers
    fn default() -> Self {
        Self::new()
            .with(ChannelType::Email, |message, provider| {
                Box::new(EmailHandler::new(message.clone(), provider))
            })
            .with(ChannelType::Sms, |message, provider| {
                Box::new(SmsHandler::new(message.clone(), provider))
            })
    }
}

impl HandlerRegistry {
    /// Registry without any channels
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Add or replace the factory for a channel
    pub fn register<F>(&mut self, channel: ChannelType, factory: F)
    where
        F: Fn(&Message, Arc<dyn Provider>) -> Box<dyn ChannelHandler> + Send + Sync + 'static,
    {
        self.factories.insert(channel, Arc::new(factory));
    }

    /// Builder form of `register`
    pub fn with<F>(mut self, channel: ChannelType, factory: F) -> Self
    where
        F: Fn(&Message, Arc<dyn Provider>) -> Box<dyn ChannelHandler> + Send + Sync + 'static,
    {
        self.register(channel, factory);
        self
    }

    pub fn contains(&self, channel: ChannelType) -> bool {
        self.factories.contains_key(&channel)
    }

    /// Build the handler for the provider's channel, if one is registered
    pub fn resolve(
        &self,
        message: &Message,
        provider: Arc<dyn Provider>,
    ) -> Option<Box<dyn ChannelHandler>> {
        self.factories
            .get(&provider.channel_type())
            .map(|factory| factory(message, provider))
    }
}

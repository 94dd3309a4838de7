//! Provider capability traits, delivery options, and errors

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::template::ChannelType;

/// Errors raised by providers and provider stores
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The delivery endpoint answered with a non-success status
    #[error("Provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure talking to the delivery endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("A provider is already registered for the {0} channel")]
    AlreadyRegistered(ChannelType),

    /// Delivery failed for a provider-specific reason
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Failure reported by an external provider backend
    #[error("Provider backend error: {0}")]
    Backend(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// A rendered email, ready to hand off to a provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailOptions {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// A rendered SMS, ready to hand off to a provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsOptions {
    pub to: String,
    pub content: String,
}

/// Delivery capability for email providers
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Hand the email off to the external delivery service
    async fn send_email(&self, options: &EmailOptions) -> ProviderResult<()>;
}

/// Delivery capability for SMS providers
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Hand the SMS off to the external delivery service
    async fn send_sms(&self, options: &SmsOptions) -> ProviderResult<()>;
}

/// A configured connection to an external delivery service.
///
/// Providers are scoped to one channel. Channel handlers reach the delivery
/// operation through the capability accessors, which return `None` when the
/// provider cannot deliver that kind of message.
pub trait Provider: Send + Sync {
    fn id(&self) -> &str;

    fn channel_type(&self) -> ChannelType;

    fn as_email(&self) -> Option<&dyn EmailProvider> {
        None
    }

    fn as_sms(&self) -> Option<&dyn SmsProvider> {
        None
    }
}

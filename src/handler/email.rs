use std::sync::Arc;

use async_trait::async_trait;

use super::{ChannelHandler, HandlerError, HandlerResult};
use crate::provider::{EmailOptions, Provider};
use crate::template::{render, ChannelType, Message, TriggerPayload};

/// Payload field holding the email recipient
pub const EMAIL_RECIPIENT_KEY: &str = "$email";

/// Sends email messages through the provider's email capability
pub struct EmailHandler {
    message: Message,
    provider: Arc<dyn Provider>,
}

impl EmailHandler {
    pub fn new(message: Message, provider: Arc<dyn Provider>) -> Self {
        Self { message, provider }
    }

    /// Render subject and body and pick the recipient from the payload
    pub fn build_options(&self, payload: &TriggerPayload) -> HandlerResult<EmailOptions> {
        let to = recipient(payload, EMAIL_RECIPIENT_KEY)?;
        let subject = self
            .message
            .subject
            .as_deref()
            .map(|s| render(s, payload))
            .unwrap_or_default();

        Ok(EmailOptions {
            to,
            subject,
            html: render(&self.message.template, payload),
        })
    }
}

#[async_trait]
impl ChannelHandler for EmailHandler {
    fn channel(&self) -> ChannelType {
        ChannelType::Email
    }

    async fn send(&self, payload: &TriggerPayload) -> HandlerResult<()> {
        let email = self
            .provider
            .as_email()
            .ok_or_else(|| HandlerError::ProviderMismatch {
                provider_id: self.provider.id().to_string(),
                expected: ChannelType::Email,
            })?;

        let options = self.build_options(payload)?;
        email.send_email(&options).await?;

        tracing::debug!(
            provider_id = %self.provider.id(),
            to = %options.to,
            "Email handed off to provider"
        );
        Ok(())
    }
}

pub(super) fn recipient(payload: &TriggerPayload, key: &'static str) -> HandlerResult<String> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(HandlerError::MissingRecipient(key))
}

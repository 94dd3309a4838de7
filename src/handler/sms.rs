use std::sync::Arc;

use async_trait::async_trait;

use super::email::recipient;
use super::{ChannelHandler, HandlerError, HandlerResult};
use crate::provider::{Provider, SmsOptions};
use crate::template::{render, ChannelType, Message, TriggerPayload};

/// Payload field holding the SMS recipient
pub const SMS_RECIPIENT_KEY: &str = "$phone";

/// Sends SMS messages through the provider's SMS capability
pub struct SmsHandler {
    message: Message,
    provider: Arc<dyn Provider>,
}

impl SmsHandler {
    pub fn new(message: Message, provider: Arc<dyn Provider>) -> Self {
        Self { message, provider }
    }

    pub fn build_options(&self, payload: &TriggerPayload) -> HandlerResult<SmsOptions> {
        Ok(SmsOptions {
            to: recipient(payload, SMS_RECIPIENT_KEY)?,
            content: render(&self.message.template, payload),
        })
    }
}

#[async_trait]
impl ChannelHandler for SmsHandler {
    fn channel(&self) -> ChannelType {
        ChannelType::Sms
    }

    async fn send(&self, payload: &TriggerPayload) -> HandlerResult<()> {
        let sms = self
            .provider
            .as_sms()
            .ok_or_else(|| HandlerError::ProviderMismatch {
                provider_id: self.provider.id().to_string(),
                expected: ChannelType::Sms,
            })?;

        let options = self.build_options(payload)?;
        sms.send_sms(&options).await?;

        tracing::debug!(
            provider_id = %self.provider.id(),
            to = %options.to,
            "SMS handed off to provider"
        );
        Ok(())
    }
}

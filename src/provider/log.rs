//! Development provider that logs messages instead of delivering them

use async_trait::async_trait;

use super::types::{EmailOptions, EmailProvider, Provider, ProviderResult, SmsOptions, SmsProvider};
use crate::template::ChannelType;

/// Provider that writes each message to the log and reports success
pub struct LogProvider {
    id: String,
    channel: ChannelType,
}

impl LogProvider {
    pub fn new(id: impl Into<String>, channel: ChannelType) -> Self {
        Self {
            id: id.into(),
            channel,
        }
    }
}

impl Provider for LogProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn channel_type(&self) -> ChannelType {
        self.channel
    }

    fn as_email(&self) -> Option<&dyn EmailProvider> {
        (self.channel == ChannelType::Email).then_some(self as &dyn EmailProvider)
    }

    fn as_sms(&self) -> Option<&dyn SmsProvider> {
        (self.channel == ChannelType::Sms).then_some(self as &dyn SmsProvider)
    }
}

#[async_trait]
impl EmailProvider for LogProvider {
    async fn send_email(&self, options: &EmailOptions) -> ProviderResult<()> {
        tracing::info!(
            provider_id = %self.id,
            to = %options.to,
            subject = %options.subject,
            body_len = options.html.len(),
            "Email delivered to log provider"
        );
        Ok(())
    }
}

#[async_trait]
impl SmsProvider for LogProvider {
    async fn send_sms(&self, options: &SmsOptions) -> ProviderResult<()> {
        tracing::info!(
            provider_id = %self.id,
            to = %options.to,
            content = %options.content,
            "SMS delivered to log provider"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_follow_channel() {
        let email = LogProvider::new("log-email", ChannelType::Email);
        assert!(email.as_email().is_some());
        assert!(email.as_sms().is_none());

        let push = LogProvider::new("log-push", ChannelType::Push);
        assert!(push.as_email().is_none());
        assert!(push.as_sms().is_none());
        assert_eq!(push.channel_type(), ChannelType::Push);
    }

    #[tokio::test]
    async fn test_sends_succeed() {
        let sms = LogProvider::new("log-sms", ChannelType::Sms);
        let options = SmsOptions {
            to: "+15550100".to_string(),
            content: "hello".to_string(),
        };
        assert!(sms.as_sms().unwrap().send_sms(&options).await.is_ok());
    }
}

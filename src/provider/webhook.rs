//! Provider that hands messages to an HTTP webhook.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, instrument};

use super::types::{
    EmailOptions, EmailProvider, Provider, ProviderError, ProviderResult, SmsOptions, SmsProvider,
};
use crate::template::ChannelType;

/// JSON body posted to the webhook
#[derive(Serialize)]
struct WebhookBody<'a, T: Serialize> {
    provider: &'a str,
    channel: ChannelType,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(flatten)]
    message: &'a T,
}

/// Posts rendered messages as JSON to a delivery endpoint.
///
/// Any 2xx answer counts as handed off; other statuses are reported as
/// `ProviderError::Rejected` with the response body.
pub struct WebhookProvider {
    id: String,
    channel: ChannelType,
    url: String,
    from: Option<String>,
    client: reqwest::Client,
}

impl WebhookProvider {
    pub fn new(
        id: impl Into<String>,
        channel: ChannelType,
        url: impl Into<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            id: id.into(),
            channel,
            url: url.into(),
            from: None,
            client,
        })
    }

    /// Sender identity included in every request
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    async fn post<T: Serialize + Sync>(&self, message: &T) -> ProviderResult<()> {
        let body = WebhookBody {
            provider: &self.id,
            channel: self.channel,
            from: self.from.as_deref(),
            message,
        };

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(status = %status, "Webhook accepted message");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        error!(
            status = %status,
            body = %text,
            "Webhook rejected message"
        );
        Err(ProviderError::Rejected {
            status: status.as_u16(),
            body: text,
        })
    }
}

impl Provider for WebhookProvider {
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
impl EmailProvider for WebhookProvider {
    #[instrument(name = "webhook.send_email", skip(self, options), fields(provider_id = %self.id))]
    async fn send_email(&self, options: &EmailOptions) -> ProviderResult<()> {
        self.post(options).await
    }
}

#[async_trait]
impl SmsProvider for WebhookProvider {
    #[instrument(name = "webhook.send_sms", skip(self, options), fields(provider_id = %self.id))]
    async fn send_sms(&self, options: &SmsOptions) -> ProviderResult<()> {
        self.post(options).await
    }
}

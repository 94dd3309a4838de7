use thiserror::Error;

use crate::handler::HandlerError;
use crate::provider::ProviderError;
use crate::template::{ChannelType, TemplateError};

/// Errors that abort a trigger call
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Template on event: {0} was not found in the template store")]
    TemplateNotFound(String),

    #[error("Provider for {0} channel was not found")]
    ProviderNotFound(ChannelType),

    #[error("Send failed on {channel} channel: {source}")]
    Send {
        channel: ChannelType,
        #[source]
        source: HandlerError,
    },

    #[error("Template store error: {0}")]
    TemplateStore(#[from] TemplateError),

    #[error("Provider store error: {0}")]
    ProviderStore(#[from] ProviderError),
}

impl TriggerError {
    /// Stable label for metrics and API error codes
    pub fn kind(&self) -> &'static str {
        match self {
            TriggerError::TemplateNotFound(_) => "template_not_found",
            TriggerError::ProviderNotFound(_) => "provider_not_found",
            TriggerError::Send { .. } => "send_failed",
            TriggerError::TemplateStore(_) | TriggerError::ProviderStore(_) => "store_error",
        }
    }
}

/// Result type for trigger operations
pub type TriggerResult<T> = Result<T, TriggerError>;

//! Template types and error definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::substitution::lookup_path;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Failure reported by an external template backend
    #[error("Template backend error: {0}")]
    Backend(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Data supplied by the caller at trigger time.
///
/// Always a JSON object; substituted into message content and used to
/// evaluate activation rules. `$email` and `$phone` carry recipients.
pub type TriggerPayload = serde_json::Map<String, serde_json::Value>;

/// Delivery channel a message targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Email,
    Sms,
    Push,
    Chat,
    InApp,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Email => "email",
            ChannelType::Sms => "sms",
            ChannelType::Push => "push",
            ChannelType::Chat => "chat",
            ChannelType::InApp => "in_app",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule deciding whether a message fires for a given payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activation {
    /// Fires on every trigger (default)
    #[default]
    Always,
    /// Never fires
    Never,
    /// Fires when the payload path exists and is not null
    Present { field: String },
    /// Fires when the payload path equals the given value
    Equals {
        field: String,
        value: serde_json::Value,
    },
}

impl Activation {
    pub fn is_active(&self, payload: &TriggerPayload) -> bool {
        match self {
            Activation::Always => true,
            Activation::Never => false,
            Activation::Present { field } => {
                matches!(lookup_path(payload, field), Some(v) if !v.is_null())
            }
            Activation::Equals { field, value } => lookup_path(payload, field) == Some(value),
        }
    }
}

/// One renderable variant within a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Channel this variant is delivered on
    pub channel: ChannelType,

    /// Subject line with {{variable}} placeholders (email only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Content body with {{variable}} placeholders
    pub template: String,

    /// Activation rule evaluated against the trigger payload
    #[serde(default)]
    pub active: Activation,
}

impl Message {
    pub fn new(channel: ChannelType, template: impl Into<String>) -> Self {
        Self {
            channel,
            subject: None,
            template: template.into(),
            active: Activation::Always,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_activation(mut self, active: Activation) -> Self {
        self.active = active;
        self
    }
}

/// A notification template, keyed by the event id that triggers it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Event identifier (alphanumeric, dash, underscore, dot)
    pub id: String,

    /// Message variants in dispatch order
    pub messages: Vec<Message>,

    /// Template description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Template {
    pub fn new(id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            messages,
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Validate the template
    pub fn validate(&self) -> TemplateResult<()> {
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(TemplateError::InvalidId(
                "ID must be 1-64 characters".to_string(),
            ));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(TemplateError::InvalidId(
                "ID must contain only alphanumeric, dash, underscore, or dot".to_string(),
            ));
        }

        if self.messages.is_empty() {
            return Err(TemplateError::InvalidTemplate(format!(
                "Template {} has no messages",
                self.id
            )));
        }

        Ok(())
    }

    /// Messages whose activation rule matches the payload, in template order
    pub fn active_messages(&self, payload: &TriggerPayload) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.active.is_active(payload))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> TriggerPayload {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_channel_serde_names() {
        assert_eq!(serde_json::to_value(ChannelType::InApp).unwrap(), "in_app");
        let sms: ChannelType = serde_json::from_value(json!("sms")).unwrap();
        assert_eq!(sms, ChannelType::Sms);
        assert_eq!(ChannelType::Email.to_string(), "email");
    }

    #[test]
    fn test_activation_rules() {
        let data = payload(json!({"user": {"tier": "gold"}, "coupon": null}));

        assert!(Activation::Always.is_active(&data));
        assert!(!Activation::Never.is_active(&data));
        assert!(Activation::Present { field: "user.tier".into() }.is_active(&data));
        assert!(!Activation::Present { field: "coupon".into() }.is_active(&data));
        assert!(Activation::Equals {
            field: "user.tier".into(),
            value: json!("gold")
        }
        .is_active(&data));
        assert!(!Activation::Equals {
            field: "user.tier".into(),
            value: json!("silver")
        }
        .is_active(&data));
    }

    #[test]
    fn test_activation_deserialize() {
        let rule: Activation =
            serde_json::from_value(json!({"type": "present", "field": "$phone"})).unwrap();
        assert_eq!(rule, Activation::Present { field: "$phone".into() });

        let message: Message =
            serde_json::from_value(json!({"channel": "email", "template": "hi"})).unwrap();
        assert_eq!(message.active, Activation::Always);
    }

    #[test]
    fn test_active_messages_keep_order() {
        let template = Template::new(
            "welcome",
            vec![
                Message::new(ChannelType::Sms, "first"),
                Message::new(ChannelType::Email, "skipped").with_activation(Activation::Never),
                Message::new(ChannelType::Email, "second"),
            ],
        );

        let active = template.active_messages(&TriggerPayload::new());
        let bodies: Vec<_> = active.iter().map(|m| m.template.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }

    #[test]
    fn test_validate() {
        let ok = Template::new("order.shipped", vec![Message::new(ChannelType::Email, "x")]);
        assert!(ok.validate().is_ok());

        let bad_id = Template::new("order shipped", vec![Message::new(ChannelType::Email, "x")]);
        assert!(matches!(bad_id.validate(), Err(TemplateError::InvalidId(_))));

        let empty = Template::new("empty", vec![]);
        assert!(matches!(
            empty.validate(),
            Err(TemplateError::InvalidTemplate(_))
        ));
    }
}

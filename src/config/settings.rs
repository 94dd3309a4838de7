use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::template::{ChannelType, Template};

/// Prefix for environment overrides, e.g. `ARA_TRIGGER__SERVER__PORT=9000`
const ENV_PREFIX: &str = "ARA_TRIGGER";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub events: EventsConfig,
    /// Templates loaded into the in-memory template store at startup
    #[serde(default)]
    pub templates: Vec<Template>,
    /// Providers loaded into the in-memory provider store at startup
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Required `X-API-Key` value; unset disables the check
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP gRPC endpoint
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Trace sampling ratio (0.0-1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Buffer size of the lifecycle event broadcast channel
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
    /// Log every lifecycle event
    #[serde(default = "default_log_events")]
    pub log_events: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Log,
    Webhook,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub channel: ChannelType,
    #[serde(default)]
    pub kind: ProviderKind,
    /// Delivery endpoint (webhook providers)
    #[serde(default)]
    pub url: Option<String>,
    /// HTTP timeout in seconds (webhook providers)
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
    /// Sender identity passed to the delivery endpoint
    #[serde(default)]
    pub from: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "ara-trigger-engine".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_broadcast_capacity() -> usize {
    1024
}

fn default_log_events() -> bool {
    true
}

fn default_provider_timeout() -> u64 {
    10 // 10 seconds
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("events.broadcast_capacity", default_broadcast_capacity() as i64)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // ARA_TRIGGER__SERVER__PORT, ARA_TRIGGER__API__KEY, etc.
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
            log_events: default_log_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8082);
        assert_eq!(settings.server_addr(), "0.0.0.0:8082");
        assert_eq!(settings.events.broadcast_capacity, 1024);
        assert!(settings.events.log_events);
        assert!(!settings.telemetry.otel.enabled);
        assert!(settings.api.key.is_none());
    }

    #[test]
    fn test_parse_templates_and_providers() {
        let source = r#"
            [server]
            port = 9000

            [telemetry]
            log_format = "json"

            [[templates]]
            id = "welcome"

            [[templates.messages]]
            channel = "email"
            subject = "Welcome {{name}}"
            template = "<p>Hello {{name}}</p>"

            [[templates.messages]]
            channel = "sms"
            template = "Hi {{name}}"
            active = { type = "present", field = "$phone" }

            [[providers]]
            id = "mailer"
            channel = "email"
            kind = "webhook"
            url = "http://localhost:9999/email"

            [[providers]]
            id = "sms-log"
            channel = "sms"
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
        assert_eq!(settings.templates.len(), 1);
        assert_eq!(settings.templates[0].messages.len(), 2);
        assert_eq!(settings.templates[0].messages[1].channel, ChannelType::Sms);

        assert_eq!(settings.providers.len(), 2);
        assert_eq!(settings.providers[0].kind, ProviderKind::Webhook);
        assert_eq!(settings.providers[0].timeout_seconds, 10);
        assert_eq!(settings.providers[1].kind, ProviderKind::Log);
    }
}

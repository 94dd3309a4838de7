mod settings;

pub use settings::{
    ApiConfig, EventsConfig, LogFormat, OtelConfig, ProviderConfig, ProviderKind, ServerConfig,
    Settings, TelemetryConfig,
};

// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain layer
pub mod handler;
pub mod provider;
pub mod template;
pub mod trigger;

// Application layer
pub mod api;
pub mod server;

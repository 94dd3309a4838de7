//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;
use crate::trigger::TriggerStatsSnapshot;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub triggers: TriggerStatsSnapshot,
    pub templates: TemplateStats,
    pub providers: ProviderStats,
    pub events: EventStats,
}

#[derive(Debug, Serialize)]
pub struct TemplateStats {
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ProviderStats {
    pub total: usize,
    pub channels: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EventStats {
    pub subscribers: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let channels = state
        .provider_store
        .channels()
        .into_iter()
        .map(|c| c.as_str().to_string())
        .collect();

    Json(StatsResponse {
        triggers: state.engine.stats(),
        templates: TemplateStats {
            total: state.template_store.count(),
        },
        providers: ProviderStats {
            total: state.provider_store.count(),
            channels,
        },
        events: EventStats {
            subscribers: state.events.subscriber_count(),
        },
    })
}

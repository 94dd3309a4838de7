//! HTTP trigger handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::TriggerPayload;

#[derive(Debug, Deserialize)]
pub struct TriggerRequest {
    pub event_id: String,
    #[serde(default)]
    pub payload: TriggerPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub success: bool,
    pub trigger_event: String,
    pub timestamp: DateTime<Utc>,
}

/// Trigger the template registered for an event
#[tracing::instrument(
    name = "http.trigger",
    skip(state, request),
    fields(event_id = %request.event_id)
)]
pub async fn trigger(
    State(state): State<AppState>,
    Json(request): Json<TriggerRequest>,
) -> Result<Json<TriggerResponse>> {
    if request.event_id.trim().is_empty() {
        return Err(AppError::Validation("event_id is required".to_string()));
    }

    state
        .engine
        .trigger(&request.event_id, &request.payload)
        .await?;

    Ok(Json(TriggerResponse {
        success: true,
        trigger_event: request.event_id,
        timestamp: Utc::now(),
    }))
}

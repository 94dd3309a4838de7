use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::trigger::TriggerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Trigger(#[from] TriggerError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

/// Hide backend details from clients in production
fn redacted(log_msg: &str, public: &str) -> String {
    if is_production() {
        public.to_string()
    } else {
        log_msg.to_string()
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, String) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                msg.clone(),
            ),
            AppError::Trigger(e) => {
                let log_msg = e.to_string();
                match e {
                    TriggerError::TemplateNotFound(_) => (
                        StatusCode::NOT_FOUND,
                        "TEMPLATE_NOT_FOUND",
                        log_msg.clone(),
                        log_msg,
                    ),
                    TriggerError::ProviderNotFound(_) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "PROVIDER_NOT_FOUND",
                        log_msg.clone(),
                        log_msg,
                    ),
                    TriggerError::Send { .. } => (
                        StatusCode::BAD_GATEWAY,
                        "SEND_FAILED",
                        redacted(&log_msg, "Message delivery failed"),
                        log_msg,
                    ),
                    TriggerError::TemplateStore(_) | TriggerError::ProviderStore(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_ERROR",
                        redacted(&log_msg, "Internal server error"),
                        log_msg,
                    ),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message, log_message) = self.parts();

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %log_message,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

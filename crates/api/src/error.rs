//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rep_analysis::AnalysisError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the analysis service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Analysis rejected its input or configuration
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Logging could not be initialized
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Metrics recorder could not be installed
    #[error("Metrics setup failed: {0}")]
    Metrics(String),

    /// Server socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background analysis task failed
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Analysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => {
                error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

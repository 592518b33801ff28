//! Health and Config Routes

use axum::{extract::State, Json};
use rep_analysis::AnalysisConfig;
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub analyses_served: u64,
}

/// Health check handler
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        analyses_served: state.analyses_served.load(Ordering::Relaxed),
    })
}

/// Default analysis configuration used when a request sets no overrides
pub async fn config(State(state): State<Arc<AppState>>) -> Json<AnalysisConfig> {
    Json(state.settings.analysis.clone())
}

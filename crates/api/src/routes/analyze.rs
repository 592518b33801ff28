//! Analysis Route

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use motion_signal::{BodySide, LandmarkFrame};
use rep_analysis::{WorkoutAnalysis, WorkoutAnalyzer};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Operator overrides for the quality tiers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdOverrides {
    pub good: Option<f64>,
    pub bad: Option<f64>,
}

/// Request body for the analyze endpoint
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Video frame rate; 30 is assumed when missing or zero
    pub fps: Option<f64>,
    /// Body side to track; defaults to the configured side
    pub side: Option<BodySide>,
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
    /// One entry per decoded frame, in order
    pub frames: Vec<LandmarkFrame>,
}

/// Response for the analyze endpoint
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub frames_received: usize,
    pub analysis: WorkoutAnalysis,
}

/// Run rep analysis over submitted landmarks
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut config = state
        .settings
        .analysis
        .clone()
        .with_thresholds(request.thresholds.good, request.thresholds.bad);
    if let Some(side) = request.side {
        config.body_side = side;
    }
    let analyzer = WorkoutAnalyzer::new(config)?;

    let frames = request.frames;
    let frames_received = frames.len();
    let fps = request.fps;

    let analysis = tokio::task::spawn_blocking(move || analyzer.analyze_landmarks(&frames, fps))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    state.analyses_served.fetch_add(1, Ordering::Relaxed);
    metrics::counter!("analyses_total").increment(1);
    metrics::counter!("reps_detected_total").increment(analysis.summary.total_reps as u64);
    metrics::counter!("risky_reps_total").increment(analysis.summary.risky_reps as u64);
    metrics::histogram!("analysis_frames").record(frames_received as f64);

    let analysis_id = Uuid::new_v4();
    info!(
        "Analysis {}: {} frames, {} reps, {} risky",
        analysis_id, frames_received, analysis.summary.total_reps, analysis.summary.risky_reps
    );

    Ok(Json(AnalyzeResponse {
        analysis_id,
        analyzed_at: Utc::now(),
        frames_received,
        analysis,
    }))
}

//! Workout Rep Analysis Service
//!
//! JSON HTTP service that runs rep detection, quality tiers and injury-risk
//! rules over pose landmarks submitted by a dashboard or launcher.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod error;
mod routes;
pub mod settings;

pub use error::ApiError;
pub use settings::{LoggingSettings, ServerSettings, Settings, DEFAULT_CONFIG_FILE};

/// Application state shared across handlers
pub struct AppState {
    /// Loaded settings
    pub settings: Settings,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Completed analyses since start
    pub analyses_served: AtomicU64,
    /// Prometheus handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            settings,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            analyses_served: AtomicU64::new(0),
            metrics,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.server.max_body_bytes;

    Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/config", get(routes::health::config))
        .route("/api/v1/analyze", post(routes::analyze::analyze))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(settings: &LoggingSettings) -> Result<(), ApiError> {
    let level: Level = settings
        .level
        .parse()
        .map_err(|_| ApiError::Logging(format!("unknown log level '{}'", settings.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| ApiError::Logging(e.to_string()))
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Result<PrometheusHandle, ApiError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Metrics(e.to_string()))
}

/// Run the server
pub async fn run_server(settings: Settings) -> Result<(), ApiError> {
    let metrics = if settings.server.metrics_enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    let addr = settings.server.addr.clone();
    let state = Arc::new(AppState::new(settings, metrics));
    let app = create_router(state);

    info!("Starting analysis server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Workout Rep Analyzer - Main Entry Point
//!
//! Usage: `rep-analyzer [settings.toml]`

use api::{init_logging, run_server, Settings, DEFAULT_CONFIG_FILE};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    let settings = Settings::load_from(&config_path)?;
    init_logging(&settings.logging)?;

    info!("=== Workout Rep Analyzer v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Quality thresholds: good >= {}, bad >= {}",
        settings.analysis.good_threshold, settings.analysis.bad_threshold
    );

    run_server(settings).await?;

    Ok(())
}

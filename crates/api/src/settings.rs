//! Service settings
//!
//! Loaded from an optional TOML file, then overridden by
//! `REP_ANALYZER__<SECTION>__<KEY>` environment variables.

use crate::error::ApiError;
use config::{Config, Environment, File};
use rep_analysis::AnalysisConfig;
use serde::{Deserialize, Serialize};

/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "rep-analyzer.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "REP_ANALYZER";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address
    pub addr: String,
    /// Largest accepted request body (landmark uploads can be large)
    pub max_body_bytes: usize,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024 * 1024,
            metrics_enabled: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// All service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    /// Default analysis configuration; requests may override the quality thresholds
    pub analysis: AnalysisConfig,
}

impl Settings {
    /// Load from the given file (if it exists) and the environment
    pub fn load_from(path: &str) -> Result<Self, ApiError> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.analysis.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_signal::BodySide;
    use std::sync::{Mutex, MutexGuard};

    // Environment variables are process-wide; settings tests take turns
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn temp_config(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rep-analyzer-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _guard = env_lock();
        let settings = Settings::load_from("/nonexistent/rep-analyzer.toml").unwrap();
        assert_eq!(settings.analysis, AnalysisConfig::default());
        assert!(settings.server.metrics_enabled);
    }

    #[test]
    fn test_file_overrides() {
        let _guard = env_lock();
        let path = temp_config(
            r#"
[server]
addr = "127.0.0.1:9000"

[logging]
level = "debug"

[analysis]
good_threshold = 0.025
body_side = "left"
"#,
        );
        let settings = Settings::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.addr, "127.0.0.1:9000");
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.analysis.good_threshold, 0.025);
        assert_eq!(settings.analysis.bad_threshold, 0.013);
        assert_eq!(settings.analysis.body_side, BodySide::Left);
    }

    #[test]
    fn test_inverted_thresholds_rejected_at_load() {
        let _guard = env_lock();
        let path = temp_config("[analysis]\ngood_threshold = 0.01\nbad_threshold = 0.02\n");
        let result = Settings::load_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ApiError::Analysis(_))));
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = env_lock();
        let path = temp_config("[server]\naddr = \"127.0.0.1:9000\"\n\n[analysis]\ngood_threshold = 0.025\n");
        std::env::set_var("REP_ANALYZER__SERVER__ADDR", "127.0.0.1:9100");
        std::env::set_var("REP_ANALYZER__ANALYSIS__GOOD_THRESHOLD", "0.03");

        let result = Settings::load_from(path.to_str().unwrap());
        std::env::remove_var("REP_ANALYZER__SERVER__ADDR");
        std::env::remove_var("REP_ANALYZER__ANALYSIS__GOOD_THRESHOLD");
        std::fs::remove_file(&path).ok();

        let settings = result.unwrap();
        assert_eq!(settings.server.addr, "127.0.0.1:9100");
        assert_eq!(settings.analysis.good_threshold, 0.03);
        assert_eq!(settings.analysis.bad_threshold, 0.013);
    }
}

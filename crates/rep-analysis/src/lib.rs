//! Workout Rep Analysis
//!
//! Rule-based analysis of a joint displacement signal:
//! - Repetition detection (peak finding with height and spacing limits)
//! - Rep quality tiers and depth score
//! - Injury-risk rules over consecutive reps
//! - Workout summary

pub mod analyzer;
pub mod config;
pub mod event;
pub mod peaks;
pub mod quality;
pub mod risk;
pub mod summary;

pub use analyzer::{resolve_fps, WorkoutAnalysis, WorkoutAnalyzer, DEFAULT_FPS};
pub use config::AnalysisConfig;
pub use event::RepetitionEvent;
pub use peaks::PeakDetector;
pub use quality::{QualityClassifier, RepQuality, RepStatus};
pub use risk::{RiskEvaluator, RiskReason, RiskRule};
pub use summary::WorkoutSummary;

use motion_signal::SignalError;
use thiserror::Error;

/// Rep analysis error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input signal: {0}")]
    Signal(#[from] SignalError),
}

//! End-to-end workout analysis
//!
//! positions -> displacement signal -> peaks -> rep quality -> risk -> summary

use crate::config::AnalysisConfig;
use crate::event::RepetitionEvent;
use crate::peaks::PeakDetector;
use crate::quality::QualityClassifier;
use crate::risk::RiskEvaluator;
use crate::summary::WorkoutSummary;
use crate::AnalysisError;
use motion_signal::{
    DisplacementExtractor, DisplacementSample, DisplacementSignal, JointFrame, LandmarkFrame,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Frame rate assumed when the video does not report a usable one
pub const DEFAULT_FPS: f64 = 30.0;

/// Use the reported frame rate if it is a positive finite number
pub fn resolve_fps(fps: Option<f64>) -> f64 {
    match fps {
        Some(fps) if fps.is_finite() && fps > 0.0 => fps,
        other => {
            warn!("Unusable frame rate {:?}, assuming {} fps", other, DEFAULT_FPS);
            DEFAULT_FPS
        }
    }
}

/// Complete analysis result for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutAnalysis {
    /// Frame rate used for rep timestamps
    pub fps: f64,
    /// Displacement signal, for plotting
    pub samples: Vec<DisplacementSample>,
    /// Reps in detection order
    pub reps: Vec<RepetitionEvent>,
    pub summary: WorkoutSummary,
}

impl WorkoutAnalysis {
    /// Whether the signal was long enough to look for reps
    pub fn has_data(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Reps flagged for injury risk
    pub fn risk_moments(&self) -> impl Iterator<Item = &RepetitionEvent> {
        self.reps.iter().filter(|r| r.injury_risk)
    }
}

/// Runs the rep analysis pipeline with a fixed configuration
#[derive(Debug, Clone)]
pub struct WorkoutAnalyzer {
    config: AnalysisConfig,
    extractor: DisplacementExtractor,
    detector: PeakDetector,
    classifier: QualityClassifier,
    risk: RiskEvaluator,
}

impl WorkoutAnalyzer {
    /// Create an analyzer; the configuration is validated first
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        if let Err(err) = config.validate() {
            warn!("Rejected analysis config: {}", err);
            return Err(err);
        }
        Ok(Self::with_validated(config))
    }

    fn with_validated(config: AnalysisConfig) -> Self {
        Self {
            extractor: DisplacementExtractor::new(config.body_side),
            detector: PeakDetector::new(config.peak_height, config.peak_distance),
            classifier: QualityClassifier::new(&config),
            risk: RiskEvaluator::new(config.spike_threshold),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze raw detector output (frames without a detection are skipped)
    pub fn analyze_landmarks(
        &self,
        frames: &[LandmarkFrame],
        fps: Option<f64>,
    ) -> Result<WorkoutAnalysis, AnalysisError> {
        let signal = self.extractor.extract_landmarks(frames)?;
        Ok(self.analyze_signal(&signal, fps))
    }

    /// Analyze frames that all carry a hip/knee/ankle detection
    pub fn analyze_frames(
        &self,
        frames: &[JointFrame],
        fps: Option<f64>,
    ) -> Result<WorkoutAnalysis, AnalysisError> {
        let signal = self.extractor.extract(frames)?;
        Ok(self.analyze_signal(&signal, fps))
    }

    /// Analyze an already extracted displacement signal
    pub fn analyze_signal(&self, signal: &DisplacementSignal, fps: Option<f64>) -> WorkoutAnalysis {
        let fps = resolve_fps(fps);
        let values = signal.values();
        let peaks = self.detector.find(&values);

        let qualities: Vec<_> = peaks
            .iter()
            .map(|&peak| self.classifier.classify_peak(signal, peak))
            .collect();
        let risks = self.risk.evaluate_sequence(&qualities);

        let mut reps: Vec<RepetitionEvent> = Vec::with_capacity(peaks.len());
        for (position, ((&peak, quality), risk_reason)) in
            peaks.iter().zip(qualities).zip(risks).enumerate()
        {
            let frame = signal.frame_at(peak).unwrap_or(peak as u64);

            debug!(
                "Rep {}: frame={} amplitude={:.4} depth={} status={} risk={:?}",
                position + 1,
                frame,
                quality.amplitude,
                quality.depth_score,
                quality.status,
                risk_reason
            );

            reps.push(RepetitionEvent::new(
                position as u32 + 1,
                frame,
                fps,
                quality,
                risk_reason,
            ));
        }

        let summary = WorkoutSummary::from_reps(&reps);
        info!(
            "Analyzed {} samples: {} reps ({} good, {} bad, {} poor), {} risky",
            signal.len(),
            summary.total_reps,
            summary.good_reps,
            summary.bad_reps,
            summary.poor_reps,
            summary.risky_reps
        );

        WorkoutAnalysis {
            fps,
            samples: signal.samples().to_vec(),
            reps,
            summary,
        }
    }
}

impl Default for WorkoutAnalyzer {
    fn default() -> Self {
        Self::with_validated(AnalysisConfig::default())
    }
}

//! Rep quality tiers and depth score

use crate::config::AnalysisConfig;
use motion_signal::{DisplacementSignal, WindowStatistics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality tier of a single rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepStatus {
    /// Full range of motion
    Good,
    /// Shallow movement
    Bad,
    /// Barely any movement
    Poor,
}

impl RepStatus {
    /// Coaching feedback shown next to the rep
    pub fn comment(&self) -> &'static str {
        match self {
            RepStatus::Good => "Good depth and full range of motion.",
            RepStatus::Bad => "Shallow movement. Try going deeper.",
            RepStatus::Poor => "Very low movement. Rep may be incorrect.",
        }
    }
}

impl fmt::Display for RepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepStatus::Good => "GOOD",
            RepStatus::Bad => "BAD",
            RepStatus::Poor => "POOR",
        };
        f.write_str(label)
    }
}

/// Amplitude-derived quality of one rep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepQuality {
    /// Peak-to-trough displacement range around the peak
    pub amplitude: f64,
    /// Amplitude scaled to 0..=100
    pub depth_score: u8,
    pub status: RepStatus,
}

/// Classifies reps by the displacement range around their peak
#[derive(Debug, Clone, Copy)]
pub struct QualityClassifier {
    good_threshold: f64,
    bad_threshold: f64,
    max_amplitude: f64,
    window: usize,
}

impl QualityClassifier {
    /// Create a classifier from a validated config
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            good_threshold: config.good_threshold,
            bad_threshold: config.bad_threshold,
            max_amplitude: config.max_amplitude,
            window: config.window,
        }
    }

    /// Classify the rep whose peak sits at sample `peak`.
    ///
    /// Amplitude is measured over `[peak - window, peak + window)`, clipped
    /// to the signal.
    pub fn classify_peak(&self, signal: &DisplacementSignal, peak: usize) -> RepQuality {
        let start = peak.saturating_sub(self.window);
        let end = peak.saturating_add(self.window);
        let stats = WindowStatistics::compute(&signal.window(start, end));
        self.classify_amplitude(stats.range())
    }

    /// Classify a rep from its amplitude
    pub fn classify_amplitude(&self, amplitude: f64) -> RepQuality {
        let status = if amplitude >= self.good_threshold {
            RepStatus::Good
        } else if amplitude >= self.bad_threshold {
            RepStatus::Bad
        } else {
            RepStatus::Poor
        };

        RepQuality {
            amplitude,
            depth_score: self.depth_score(amplitude),
            status,
        }
    }

    /// `min(100, floor(amplitude / max_amplitude * 100))`
    pub fn depth_score(&self, amplitude: f64) -> u8 {
        let scaled = (amplitude / self.max_amplitude * 100.0).floor();
        scaled.clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classifier() -> QualityClassifier {
        QualityClassifier::new(&AnalysisConfig::default())
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let classifier = classifier();
        assert_eq!(classifier.classify_amplitude(0.022).status, RepStatus::Good);
        assert_eq!(classifier.classify_amplitude(0.0219).status, RepStatus::Bad);
        assert_eq!(classifier.classify_amplitude(0.013).status, RepStatus::Bad);
        assert_eq!(classifier.classify_amplitude(0.0129).status, RepStatus::Poor);
        assert_eq!(classifier.classify_amplitude(0.0).status, RepStatus::Poor);
    }

    #[test]
    fn test_depth_score() {
        let classifier = classifier();
        assert_eq!(classifier.depth_score(0.0), 0);
        assert_eq!(classifier.depth_score(0.025), 50);
        assert_eq!(classifier.depth_score(0.05), 100);
        assert_eq!(classifier.depth_score(0.09), 100);
    }

    #[test]
    fn test_window_amplitude_around_peak() {
        let mut values = vec![0.004; 40];
        values[20] = 0.03;
        values[5] = 0.0; // outside [8, 32)
        values[31] = 0.002; // last sample inside the window
        values[32] = 0.001; // first sample past the window
        let signal = DisplacementSignal::from_values(&values).unwrap();

        let quality = classifier().classify_peak(&signal, 20);
        assert!((quality.amplitude - 0.028).abs() < 1e-12);
        assert_eq!(quality.status, RepStatus::Good);
    }

    #[test]
    fn test_window_clipped_at_signal_start() {
        let values = [0.01, 0.02, 0.015];
        let signal = DisplacementSignal::from_values(&values).unwrap();
        let quality = classifier().classify_peak(&signal, 1);
        assert!((quality.amplitude - 0.01).abs() < 1e-12);
        assert_eq!(quality.status, RepStatus::Poor);
    }

    #[test]
    fn test_status_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&RepStatus::Bad).unwrap(), "\"BAD\"");
        assert_eq!(RepStatus::Poor.to_string(), "POOR");
    }

    proptest! {
        #[test]
        fn prop_depth_score_bounded_and_monotonic(a in 0.0f64..0.2, b in 0.0f64..0.2) {
            let classifier = classifier();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classifier.depth_score(hi) <= 100);
            prop_assert!(classifier.depth_score(lo) <= classifier.depth_score(hi));
        }
    }
}

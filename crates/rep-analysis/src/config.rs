//! Rep analysis configuration

use crate::AnalysisError;
use motion_signal::BodySide;
use serde::{Deserialize, Serialize};

/// Rep analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Body side whose hip/knee/ankle are tracked
    pub body_side: BodySide,

    /// Minimum displacement for a peak to count as a rep
    pub peak_height: f64,

    /// Minimum spacing between reps (samples)
    pub peak_distance: usize,

    /// Half-width of the amplitude window around each peak (samples)
    pub window: usize,

    /// Amplitude at or above which a rep is GOOD
    pub good_threshold: f64,

    /// Amplitude at or above which a rep is BAD (below is POOR)
    pub bad_threshold: f64,

    /// Amplitude above which a rep is flagged as an uncontrolled spike
    pub spike_threshold: f64,

    /// Amplitude that maps to a depth score of 100
    pub max_amplitude: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            body_side: BodySide::Right,
            peak_height: 0.012,
            peak_distance: 16,
            window: 12,
            good_threshold: 0.022,
            bad_threshold: 0.013,
            spike_threshold: 0.045,
            max_amplitude: 0.05,
        }
    }
}

impl AnalysisConfig {
    /// Create strict config (higher quality thresholds)
    pub fn strict() -> Self {
        Self {
            good_threshold: 0.026,
            bad_threshold: 0.016,
            spike_threshold: 0.04,
            ..Default::default()
        }
    }

    /// Create lenient config (lower quality thresholds)
    pub fn lenient() -> Self {
        Self {
            good_threshold: 0.018,
            bad_threshold: 0.010,
            ..Default::default()
        }
    }

    /// Apply operator overrides for the quality thresholds.
    ///
    /// Overrides replace the configured values as given; call
    /// [`validate`](Self::validate) afterwards.
    pub fn with_thresholds(mut self, good: Option<f64>, bad: Option<f64>) -> Self {
        if let Some(good) = good {
            self.good_threshold = good;
        }
        if let Some(bad) = bad {
            self.bad_threshold = bad;
        }
        self
    }

    /// Check that thresholds are finite, ordered and non-degenerate
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let thresholds = [
            ("peak_height", self.peak_height),
            ("good_threshold", self.good_threshold),
            ("bad_threshold", self.bad_threshold),
            ("spike_threshold", self.spike_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if !self.max_amplitude.is_finite() || self.max_amplitude <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "max_amplitude must be positive, got {}",
                self.max_amplitude
            )));
        }

        if self.bad_threshold > self.good_threshold {
            return Err(AnalysisError::InvalidConfig(format!(
                "bad_threshold {} exceeds good_threshold {}",
                self.bad_threshold, self.good_threshold
            )));
        }

        if self.window == 0 {
            return Err(AnalysisError::InvalidConfig("window must be at least 1 sample".into()));
        }
        if self.peak_distance == 0 {
            return Err(AnalysisError::InvalidConfig(
                "peak_distance must be at least 1 sample".into(),
            ));
        }

        Ok(())
    }
}

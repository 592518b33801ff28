//! Inter-frame Joint Displacement

use crate::error::SignalError;
use crate::joint::{BodySide, JointFrame, LandmarkFrame};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mean joint displacement between a frame and the previous retained frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplacementSample {
    /// Frame index of the later frame in the pair
    pub frame_index: u64,
    /// Mean Euclidean displacement of hip, knee and ankle (>= 0)
    pub value: f64,
}

/// Fully materialized displacement signal for one video.
///
/// Samples are ordered by strictly increasing `frame_index` and every value
/// is finite and non-negative. Serialized as a plain sample list; decoding
/// goes through the same checks as [`DisplacementSignal::from_samples`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<DisplacementSample>",
    into = "Vec<DisplacementSample>"
)]
pub struct DisplacementSignal {
    samples: Vec<DisplacementSample>,
}

impl DisplacementSignal {
    /// Build a signal from samples, checking ordering and values
    pub fn from_samples(samples: Vec<DisplacementSample>) -> Result<Self, SignalError> {
        for sample in &samples {
            if !sample.value.is_finite() || sample.value < 0.0 {
                return Err(SignalError::InvalidSample {
                    frame_index: sample.frame_index,
                    value: sample.value,
                });
            }
        }
        for pair in samples.windows(2) {
            if pair[1].frame_index <= pair[0].frame_index {
                return Err(SignalError::OutOfOrder {
                    previous: pair[0].frame_index,
                    current: pair[1].frame_index,
                });
            }
        }
        Ok(Self { samples })
    }

    /// Build a signal from raw values, assuming an unbroken run of frames
    /// starting at frame 0 (so sample `i` belongs to frame `i + 1`).
    pub fn from_values(values: &[f64]) -> Result<Self, SignalError> {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &value)| DisplacementSample {
                frame_index: i as u64 + 1,
                value,
            })
            .collect();
        Self::from_samples(samples)
    }

    /// All samples in frame order
    pub fn samples(&self) -> &[DisplacementSample] {
        &self.samples
    }

    /// Displacement values in frame order
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Frame index of the sample at position `index`
    pub fn frame_at(&self, index: usize) -> Option<u64> {
        self.samples.get(index).map(|s| s.frame_index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Values in `[start, end)`, clipped to the signal bounds
    pub fn window(&self, start: usize, end: usize) -> Vec<f64> {
        let end = end.min(self.samples.len());
        let start = start.min(end);
        self.samples[start..end].iter().map(|s| s.value).collect()
    }
}

impl TryFrom<Vec<DisplacementSample>> for DisplacementSignal {
    type Error = SignalError;

    fn try_from(samples: Vec<DisplacementSample>) -> Result<Self, Self::Error> {
        Self::from_samples(samples)
    }
}

impl From<DisplacementSignal> for Vec<DisplacementSample> {
    fn from(signal: DisplacementSignal) -> Self {
        signal.samples
    }
}

/// Converts joint positions into a displacement signal
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplacementExtractor {
    /// Side whose hip/knee/ankle are tracked
    side: BodySide,
}

impl DisplacementExtractor {
    /// Create a new extractor for the given body side
    pub fn new(side: BodySide) -> Self {
        Self { side }
    }

    /// Extract displacement from frames that all carry a detection.
    ///
    /// One sample per consecutive pair, stamped with the later frame. Fewer
    /// than two frames yields an empty signal.
    pub fn extract(&self, frames: &[JointFrame]) -> Result<DisplacementSignal, SignalError> {
        let mut samples = Vec::with_capacity(frames.len().saturating_sub(1));
        let mut previous: Option<&JointFrame> = None;

        for frame in frames {
            if let Some(joint) = frame.non_finite_joint() {
                return Err(SignalError::NonFiniteCoordinate {
                    frame_index: frame.frame_index,
                    joint: joint.name(),
                });
            }

            if let Some(prev) = previous {
                if frame.frame_index <= prev.frame_index {
                    return Err(SignalError::OutOfOrder {
                        previous: prev.frame_index,
                        current: frame.frame_index,
                    });
                }
                samples.push(DisplacementSample {
                    frame_index: frame.frame_index,
                    value: prev.mean_displacement(frame),
                });
            }
            previous = Some(frame);
        }

        debug!(
            "Extracted {} displacement samples from {} frames",
            samples.len(),
            frames.len()
        );

        Ok(DisplacementSignal { samples })
    }

    /// Extract displacement from raw detector output.
    ///
    /// Frames without a detection (or missing one of the tracked joints) are
    /// skipped, so the next detected frame pairs with the last retained one.
    pub fn extract_landmarks(&self, frames: &[LandmarkFrame]) -> Result<DisplacementSignal, SignalError> {
        let retained: Vec<JointFrame> = frames
            .iter()
            .filter_map(|f| f.to_joint_frame(self.side))
            .collect();

        let skipped = frames.len() - retained.len();
        if skipped > 0 {
            debug!("Skipped {} of {} frames without a usable detection", skipped, frames.len());
        }

        self.extract(&retained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Point2;
    use proptest::prelude::*;

    fn frame_at(frame_index: u64, y: f64) -> JointFrame {
        JointFrame::new(
            frame_index,
            Point2::new(0.5, y),
            Point2::new(0.5, y + 0.2),
            Point2::new(0.5, y + 0.4),
        )
    }

    #[test]
    fn test_empty_and_single_frame() {
        let extractor = DisplacementExtractor::default();
        assert!(extractor.extract(&[]).unwrap().is_empty());
        assert!(extractor.extract(&[frame_at(0, 0.1)]).unwrap().is_empty());
    }

    #[test]
    fn test_sample_per_consecutive_pair() {
        let extractor = DisplacementExtractor::default();
        let frames = vec![frame_at(0, 0.10), frame_at(1, 0.13), frame_at(2, 0.13)];
        let signal = extractor.extract(&frames).unwrap();

        assert_eq!(signal.len(), 2);
        assert_eq!(signal.frame_at(0), Some(1));
        assert_eq!(signal.frame_at(1), Some(2));
        // Every joint moved 0.03 vertically
        assert!((signal.samples()[0].value - 0.03).abs() < 1e-12);
        assert_eq!(signal.samples()[1].value, 0.0);
    }

    #[test]
    fn test_undetected_frames_are_skipped() {
        let extractor = DisplacementExtractor::new(BodySide::Right);
        let p = |y: f64| Point2::new(0.5, y);
        let frames = vec![
            LandmarkFrame::detected(0, BodySide::Right, p(0.1), p(0.3), p(0.5)),
            LandmarkFrame::undetected(1),
            LandmarkFrame::undetected(2),
            LandmarkFrame::detected(3, BodySide::Right, p(0.2), p(0.4), p(0.6)),
            LandmarkFrame::detected(4, BodySide::Left, p(0.9), p(0.9), p(0.9)),
        ];
        let signal = extractor.extract_landmarks(&frames).unwrap();

        assert_eq!(signal.len(), 1);
        assert_eq!(signal.frame_at(0), Some(3));
        assert!((signal.samples()[0].value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let extractor = DisplacementExtractor::default();
        let mut bad = frame_at(1, 0.1);
        bad.hip.y = f64::INFINITY;
        let err = extractor.extract(&[frame_at(0, 0.1), bad]).unwrap_err();
        assert_eq!(
            err,
            SignalError::NonFiniteCoordinate {
                frame_index: 1,
                joint: "hip"
            }
        );
    }

    #[test]
    fn test_out_of_order_frames_rejected() {
        let extractor = DisplacementExtractor::default();
        let err = extractor
            .extract(&[frame_at(5, 0.1), frame_at(5, 0.2)])
            .unwrap_err();
        assert!(matches!(err, SignalError::OutOfOrder { previous: 5, current: 5 }));
    }

    #[test]
    fn test_window_is_clipped() {
        let signal = DisplacementSignal::from_values(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(signal.window(2, 10), vec![0.3, 0.4]);
        assert_eq!(signal.window(0, 1), vec![0.1]);
        assert!(signal.window(7, 10).is_empty());
    }

    #[test]
    fn test_from_samples_validation() {
        assert!(DisplacementSignal::from_values(&[0.1, -0.01]).is_err());
        assert!(DisplacementSignal::from_values(&[f64::NAN]).is_err());
        let unordered = vec![
            DisplacementSample { frame_index: 4, value: 0.1 },
            DisplacementSample { frame_index: 2, value: 0.1 },
        ];
        assert!(DisplacementSignal::from_samples(unordered).is_err());
    }

    #[test]
    fn test_deserialize_validates_samples() {
        let decreasing = r#"[{"frame_index": 1000, "value": 0.0}, {"frame_index": 999, "value": 0.02}]"#;
        assert!(serde_json::from_str::<DisplacementSignal>(decreasing).is_err());

        let negative = r#"[{"frame_index": 1, "value": -0.01}, {"frame_index": 2, "value": 0.02}]"#;
        assert!(serde_json::from_str::<DisplacementSignal>(negative).is_err());

        let signal = DisplacementSignal::from_values(&[0.0, 0.03, 0.0]).unwrap();
        let json = serde_json::to_string(&signal).unwrap();
        let decoded: DisplacementSignal = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, signal);
        assert_eq!(decoded.frame_at(1), Some(2));
    }

    proptest! {
        #[test]
        fn prop_length_is_retained_minus_one(ys in prop::collection::vec(0.0f64..1.0, 0..64)) {
            let frames: Vec<JointFrame> = ys
                .iter()
                .enumerate()
                .map(|(i, &y)| frame_at(i as u64 * 2, y))
                .collect();
            let signal = DisplacementExtractor::default().extract(&frames).unwrap();

            prop_assert_eq!(signal.len(), frames.len().saturating_sub(1));
            prop_assert!(signal.samples().iter().all(|s| s.value >= 0.0));
        }
    }
}

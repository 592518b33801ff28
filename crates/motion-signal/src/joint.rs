//! Joint and landmark types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 2D point in normalized image coordinates ([0, 1] on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Lower-body joints tracked for rep analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Joint {
    Hip,
    Knee,
    Ankle,
}

/// Joints in the order they are stored in a [`JointFrame`]
pub const TRACKED_JOINTS: [Joint; 3] = [Joint::Hip, Joint::Knee, Joint::Ankle];

impl Joint {
    /// Lowercase joint name
    pub fn name(&self) -> &'static str {
        match self {
            Joint::Hip => "hip",
            Joint::Knee => "knee",
            Joint::Ankle => "ankle",
        }
    }

    /// Landmark key for this joint on the given side, e.g. `right_knee`
    pub fn key(&self, side: BodySide) -> String {
        format!("{}_{}", side.name(), self.name())
    }
}

/// Body side whose joints are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    Left,
    #[default]
    Right,
}

impl BodySide {
    /// Lowercase side name
    pub fn name(&self) -> &'static str {
        match self {
            BodySide::Left => "left",
            BodySide::Right => "right",
        }
    }
}

/// Hip, knee and ankle positions for one video frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointFrame {
    /// Decoder frame number (keeps counting through undetected frames)
    pub frame_index: u64,
    pub hip: Point2,
    pub knee: Point2,
    pub ankle: Point2,
}

impl JointFrame {
    /// Create a new joint frame
    pub fn new(frame_index: u64, hip: Point2, knee: Point2, ankle: Point2) -> Self {
        Self {
            frame_index,
            hip,
            knee,
            ankle,
        }
    }

    /// Points in [`TRACKED_JOINTS`] order
    pub fn points(&self) -> [Point2; 3] {
        [self.hip, self.knee, self.ankle]
    }

    /// Mean per-joint Euclidean distance to another frame
    pub fn mean_displacement(&self, other: &JointFrame) -> f64 {
        let total: f64 = self
            .points()
            .iter()
            .zip(other.points().iter())
            .map(|(a, b)| a.distance(b))
            .sum();
        total / TRACKED_JOINTS.len() as f64
    }

    /// First joint with a non-finite coordinate, if any
    pub fn non_finite_joint(&self) -> Option<Joint> {
        TRACKED_JOINTS
            .iter()
            .zip(self.points().iter())
            .find(|(_, p)| !p.is_finite())
            .map(|(j, _)| *j)
    }
}

/// Raw pose detector output for one decoded frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Decoder frame number
    pub frame_index: u64,
    /// Landmarks keyed by `<side>_<joint>`; `None` when nothing was detected
    #[serde(default)]
    pub landmarks: Option<BTreeMap<String, Point2>>,
}

impl LandmarkFrame {
    /// Frame with no detection
    pub fn undetected(frame_index: u64) -> Self {
        Self {
            frame_index,
            landmarks: None,
        }
    }

    /// Frame with hip/knee/ankle landmarks on one side
    pub fn detected(frame_index: u64, side: BodySide, hip: Point2, knee: Point2, ankle: Point2) -> Self {
        let landmarks = TRACKED_JOINTS
            .iter()
            .zip([hip, knee, ankle])
            .map(|(joint, point)| (joint.key(side), point))
            .collect();
        Self {
            frame_index,
            landmarks: Some(landmarks),
        }
    }

    /// Select the tracked joints for a side.
    ///
    /// Returns `None` if there was no detection or any of the three joints
    /// is missing.
    pub fn to_joint_frame(&self, side: BodySide) -> Option<JointFrame> {
        let landmarks = self.landmarks.as_ref()?;
        let hip = landmarks.get(&Joint::Hip.key(side))?;
        let knee = landmarks.get(&Joint::Knee.key(side))?;
        let ankle = landmarks.get(&Joint::Ankle.key(side))?;
        Some(JointFrame::new(self.frame_index, *hip, *knee, *ankle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean_displacement() {
        let origin = Point2::new(0.5, 0.5);
        let a = JointFrame::new(0, origin, origin, origin);
        // Only the ankle moves, by 0.3
        let b = JointFrame::new(1, origin, origin, Point2::new(0.5, 0.8));
        assert!((a.mean_displacement(&b) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_landmark_selection_by_side() {
        let p = Point2::new(0.1, 0.2);
        let frame = LandmarkFrame::detected(7, BodySide::Left, p, p, p);

        assert!(frame.to_joint_frame(BodySide::Right).is_none());
        let joints = frame.to_joint_frame(BodySide::Left).unwrap();
        assert_eq!(joints.frame_index, 7);
        assert_eq!(joints.knee, p);
    }

    #[test]
    fn test_missing_joint_drops_frame() {
        let p = Point2::new(0.1, 0.2);
        let mut frame = LandmarkFrame::detected(3, BodySide::Right, p, p, p);
        frame.landmarks.as_mut().unwrap().remove("right_ankle");
        assert!(frame.to_joint_frame(BodySide::Right).is_none());
        assert!(LandmarkFrame::undetected(4).to_joint_frame(BodySide::Right).is_none());
    }

    #[test]
    fn test_landmark_frame_json() {
        let json = r#"{"frame_index": 12, "landmarks": {
            "right_hip": {"x": 0.5, "y": 0.4},
            "right_knee": {"x": 0.5, "y": 0.6},
            "right_ankle": {"x": 0.5, "y": 0.8}
        }}"#;
        let frame: LandmarkFrame = serde_json::from_str(json).unwrap();
        let joints = frame.to_joint_frame(BodySide::default()).unwrap();
        assert_eq!(joints.ankle, Point2::new(0.5, 0.8));

        let empty: LandmarkFrame = serde_json::from_str(r#"{"frame_index": 13}"#).unwrap();
        assert!(empty.landmarks.is_none());
    }

    #[test]
    fn test_non_finite_joint() {
        let p = Point2::new(0.1, 0.2);
        let frame = JointFrame::new(0, p, Point2::new(f64::NAN, 0.0), p);
        assert_eq!(frame.non_finite_joint(), Some(Joint::Knee));
    }
}

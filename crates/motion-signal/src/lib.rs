//! Motion Signal Extraction
//!
//! Turns per-frame hip/knee/ankle positions from an external pose detector
//! into a scalar inter-frame displacement signal.

mod displacement;
mod error;
mod joint;
mod statistics;

pub use displacement::{DisplacementExtractor, DisplacementSample, DisplacementSignal};
pub use error::SignalError;
pub use joint::{BodySide, Joint, JointFrame, LandmarkFrame, Point2, TRACKED_JOINTS};
pub use statistics::WindowStatistics;

//! Per-rep analysis record

use crate::quality::{RepQuality, RepStatus};
use crate::risk::RiskReason;
use serde::{Deserialize, Serialize};

/// One detected and classified repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionEvent {
    /// 1-based rep number in detection order
    pub rep_number: u32,
    /// Frame index of the rep's displacement peak
    pub frame: u64,
    /// `frame / fps`
    pub time_seconds: f64,
    pub amplitude: f64,
    /// 0..=100
    pub depth_score: u8,
    pub status: RepStatus,
    /// Coaching feedback for the tier
    pub comment: String,
    pub injury_risk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_reason: Option<RiskReason>,
}

impl RepetitionEvent {
    /// Assemble an event from its classified parts
    pub fn new(
        rep_number: u32,
        frame: u64,
        fps: f64,
        quality: RepQuality,
        risk_reason: Option<RiskReason>,
    ) -> Self {
        Self {
            rep_number,
            frame,
            time_seconds: frame as f64 / fps,
            amplitude: quality.amplitude,
            depth_score: quality.depth_score,
            status: quality.status,
            comment: quality.status.comment().to_string(),
            injury_risk: risk_reason.is_some(),
            risk_reason,
        }
    }

    /// Human-readable risk reason, if flagged
    pub fn risk_message(&self) -> Option<&'static str> {
        self.risk_reason.map(|r| r.message())
    }
}

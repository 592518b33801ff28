//! Injury-risk rules
//!
//! Rules are evaluated in a fixed order against the current rep and the
//! rep immediately before it. When several rules match, the reason of the
//! last matching rule is reported.

use crate::quality::{RepQuality, RepStatus};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Why a rep was flagged; serialized as its message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskReason {
    /// POOR rep: too little movement under load
    LowDepthStrain,
    /// Amplitude above the spike threshold
    Spike,
    /// Non-GOOD rep straight after a GOOD one
    FatigueDrop,
}

impl RiskReason {
    /// Human-readable reason
    pub fn message(&self) -> &'static str {
        match self {
            RiskReason::LowDepthStrain => "Very low movement depth (high strain risk)",
            RiskReason::Spike => "Sudden high spike (possible uncontrolled movement)",
            RiskReason::FatigueDrop => "Quality drop after good rep (fatigue risk)",
        }
    }
}

impl fmt::Display for RiskReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for RiskReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

impl<'de> Deserialize<'de> for RiskReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let message = String::deserialize(deserializer)?;
        [RiskReason::LowDepthStrain, RiskReason::Spike, RiskReason::FatigueDrop]
            .into_iter()
            .find(|reason| reason.message() == message)
            .ok_or_else(|| de::Error::custom(format!("unknown risk reason: {message}")))
    }
}

/// A single injury-risk rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskRule {
    /// Fires on POOR reps
    LowDepth,
    /// Fires when amplitude is strictly above the threshold
    Spike { threshold: f64 },
    /// Fires on a GOOD -> non-GOOD transition
    Fatigue,
}

impl RiskRule {
    /// Whether the rule fires for `current` given the previous rep's status
    pub fn matches(&self, current: &RepQuality, previous: Option<RepStatus>) -> bool {
        match self {
            RiskRule::LowDepth => current.status == RepStatus::Poor,
            RiskRule::Spike { threshold } => current.amplitude > *threshold,
            RiskRule::Fatigue => {
                current.status != RepStatus::Good && previous == Some(RepStatus::Good)
            }
        }
    }

    /// Reason reported when the rule fires
    pub fn reason(&self) -> RiskReason {
        match self {
            RiskRule::LowDepth => RiskReason::LowDepthStrain,
            RiskRule::Spike { .. } => RiskReason::Spike,
            RiskRule::Fatigue => RiskReason::FatigueDrop,
        }
    }
}

/// Ordered rule set with one rep of memory
#[derive(Debug, Clone)]
pub struct RiskEvaluator {
    rules: Vec<RiskRule>,
}

impl RiskEvaluator {
    /// Standard rule order: low depth, spike, fatigue
    pub fn new(spike_threshold: f64) -> Self {
        Self {
            rules: vec![
                RiskRule::LowDepth,
                RiskRule::Spike {
                    threshold: spike_threshold,
                },
                RiskRule::Fatigue,
            ],
        }
    }

    /// Reason of the last matching rule, or `None` if the rep is safe
    pub fn evaluate(&self, current: &RepQuality, previous: Option<RepStatus>) -> Option<RiskReason> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(current, previous))
            .last()
            .map(RiskRule::reason)
    }

    /// Evaluate a whole sequence of reps in order
    pub fn evaluate_sequence(&self, reps: &[RepQuality]) -> Vec<Option<RiskReason>> {
        let mut previous = None;
        reps.iter()
            .map(|rep| {
                let reason = self.evaluate(rep, previous);
                previous = Some(rep.status);
                reason
            })
            .collect()
    }
}

impl Default for RiskEvaluator {
    fn default() -> Self {
        Self::new(0.045)
    }
}

//! Workout-level summary

use crate::event::RepetitionEvent;
use crate::quality::RepStatus;
use serde::{Deserialize, Serialize};

/// Counts and averages over all reps of a workout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub total_reps: usize,
    pub good_reps: usize,
    pub bad_reps: usize,
    pub poor_reps: usize,
    /// Reps with `injury_risk` set
    pub risky_reps: usize,
    /// Mean depth score (0 when there are no reps)
    pub mean_depth_score: f64,
}

impl WorkoutSummary {
    /// Aggregate a list of reps
    pub fn from_reps(reps: &[RepetitionEvent]) -> Self {
        let count = |status: RepStatus| reps.iter().filter(|r| r.status == status).count();

        let mean_depth_score = if reps.is_empty() {
            0.0
        } else {
            reps.iter().map(|r| f64::from(r.depth_score)).sum::<f64>() / reps.len() as f64
        };

        Self {
            total_reps: reps.len(),
            good_reps: count(RepStatus::Good),
            bad_reps: count(RepStatus::Bad),
            poor_reps: count(RepStatus::Poor),
            risky_reps: reps.iter().filter(|r| r.injury_risk).count(),
            mean_depth_score,
        }
    }

    /// Whether any rep was flagged
    pub fn has_risk(&self) -> bool {
        self.risky_reps > 0
    }
}

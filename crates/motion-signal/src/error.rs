//! Signal Error Types

use thiserror::Error;

/// Errors raised while building a displacement signal
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// A landmark coordinate was NaN or infinite
    #[error("Non-finite {joint} coordinate in frame {frame_index}")]
    NonFiniteCoordinate {
        frame_index: u64,
        joint: &'static str,
    },

    /// Frames must arrive in strictly increasing frame order
    #[error("Frame {current} arrived after frame {previous}")]
    OutOfOrder { previous: u64, current: u64 },

    /// A displacement value was negative or not finite
    #[error("Invalid displacement value {value} at frame {frame_index}")]
    InvalidSample { frame_index: u64, value: f64 },
}

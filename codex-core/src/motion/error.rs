//! Motion and descent errors
//!
//! Both are fatal for a run: once a jog fails the position belief can no
//! longer be trusted, and a tripped descent guard means something is
//! physically wrong under the head.

use core::fmt;

use crate::traits::StageError;

/// Motion driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// Stage failed or refused a home or jog command
    SendFailed(StageError),
    /// Requested coordinate is NaN or infinite; nothing was sent
    NonFiniteTarget,
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::SendFailed(e) => write!(f, "motion command not sent: {}", e),
            MotionError::NonFiniteTarget => write!(f, "target coordinate is not finite"),
        }
    }
}

impl core::error::Error for MotionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            MotionError::SendFailed(e) => Some(e),
            MotionError::NonFiniteTarget => None,
        }
    }
}

impl From<StageError> for MotionError {
    fn from(e: StageError) -> Self {
        MotionError::SendFailed(e)
    }
}

/// Contact descent errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DescentError {
    /// Travelled the full limit without the sensor closing
    TravelLimitExceeded {
        /// Configured limit in mm
        limit_mm: f64,
        /// Downward travel commanded before giving up
        traveled_mm: f64,
    },
    /// Step size is not a distance the stage would be sent
    InvalidStep { step_mm: f64 },
    /// A descent step could not be sent
    Motion(MotionError),
}

impl fmt::Display for DescentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescentError::TravelLimitExceeded {
                limit_mm,
                traveled_mm,
            } => write!(
                f,
                "no contact after {:.2} mm (limit {:.2} mm)",
                traveled_mm, limit_mm
            ),
            DescentError::InvalidStep { step_mm } => {
                write!(f, "descent step too small to move the head, got {} mm", step_mm)
            }
            DescentError::Motion(e) => write!(f, "descent step failed: {}", e),
        }
    }
}

impl core::error::Error for DescentError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DescentError::TravelLimitExceeded { .. } | DescentError::InvalidStep { .. } => None,
            DescentError::Motion(e) => Some(e),
        }
    }
}

impl From<MotionError> for DescentError {
    fn from(e: MotionError) -> Self {
        DescentError::Motion(e)
    }
}

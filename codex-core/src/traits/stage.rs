//! Motion stage trait
//!
//! The stage is a networked motion controller that only takes relative
//! jogs. It cannot report where the head is.

use core::fmt;

/// Errors reported by the stage client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    /// Controller unreachable or the transport failed
    Communication,
    /// Controller refused the command
    Rejected,
    /// Controller is busy with another job
    Busy,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Communication => f.write_str("stage communication failed"),
            StageError::Rejected => f.write_str("stage rejected the command"),
            StageError::Busy => f.write_str("stage is busy"),
        }
    }
}

impl core::error::Error for StageError {}

/// Trait for relative-jog motion stages
pub trait StageClient {
    /// Run the firmware homing routine
    ///
    /// Afterwards the head sits at firmware zero, not at the post-home
    /// offset.
    fn home(&mut self) -> Result<(), StageError>;

    /// Move by a relative offset in millimeters
    fn jog(&mut self, dx: f64, dy: f64, dz: f64) -> Result<(), StageError>;
}

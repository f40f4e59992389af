//! Motion bookkeeping
//!
//! The stage only understands relative jogs, so the absolute position is a
//! belief kept here and advanced only by confirmed motion.

pub mod error;
pub mod position;

pub use error::{DescentError, MotionError};
pub use position::{Delta, Destination, MotionRequest, Position, PositionTracker, MOTION_EPSILON_MM};

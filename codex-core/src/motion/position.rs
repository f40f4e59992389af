//! Position belief for a stage driven by relative jogs
//!
//! These types define what the controller believes about the head location
//! and how absolute requests become relative deltas.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Deltas smaller than this on every axis are not worth a jog
pub const MOTION_EPSILON_MM: f64 = 1e-6;

/// Absolute head position in millimeters
///
/// Relative to firmware zero. After a home this equals the post-home offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Firmware zero
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by a delta
    pub fn offset(self, delta: Delta) -> Self {
        Self {
            x: self.x + delta.dx,
            y: self.y + delta.dy,
            z: self.z + delta.dz,
        }
    }
}

/// Relative motion in millimeters, the only thing the stage accepts
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Delta {
    pub const fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Check if every axis is below the motion epsilon
    pub fn is_negligible(&self) -> bool {
        negligible(self.dx) && negligible(self.dy) && negligible(self.dz)
    }
}

fn negligible(d: f64) -> bool {
    d > -MOTION_EPSILON_MM && d < MOTION_EPSILON_MM
}

/// Absolute move request; absent axes are left where they are
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionRequest {
    pub target_x: Option<f64>,
    pub target_y: Option<f64>,
    pub target_z: Option<f64>,
}

impl MotionRequest {
    /// Request touching all three axes
    pub fn to(position: Position) -> Self {
        Self {
            target_x: Some(position.x),
            target_y: Some(position.y),
            target_z: Some(position.z),
        }
    }

    /// Request touching only X and Y
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            target_x: Some(x),
            target_y: Some(y),
            target_z: None,
        }
    }

    pub fn x(x: f64) -> Self {
        Self {
            target_x: Some(x),
            ..Self::default()
        }
    }

    pub fn z(z: f64) -> Self {
        Self {
            target_z: Some(z),
            ..Self::default()
        }
    }

    /// Check if every requested coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        [self.target_x, self.target_y, self.target_z]
            .iter()
            .flatten()
            .all(|v| v.is_finite())
    }

    /// Relative motion needed to satisfy this request from `current`
    pub fn delta_from(&self, current: Position) -> Delta {
        Delta {
            dx: self.target_x.map_or(0.0, |x| x - current.x),
            dy: self.target_y.map_or(0.0, |y| y - current.y),
            dz: self.target_z.map_or(0.0, |z| z - current.z),
        }
    }
}

/// Where a routed card is dropped
///
/// `z` already includes the vertical clearance above the bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Destination {
    /// Lateral leg of the drop move, holding the current height
    pub fn lateral(&self) -> MotionRequest {
        MotionRequest::xy(self.x, self.y)
    }

    /// Vertical leg of the drop move
    pub fn vertical(&self) -> MotionRequest {
        MotionRequest::z(self.z)
    }
}

/// Believed head position
///
/// Starts at firmware zero. Nothing but the motion driver should call
/// [`PositionTracker::apply`], and only once the stage accepted the jog.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    position: Position,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self {
            position: Position::ORIGIN,
        }
    }

    /// Snapshot of the believed position
    pub fn current(&self) -> Position {
        self.position
    }

    /// Advance the belief by a confirmed jog
    pub fn apply(&mut self, dx: f64, dy: f64, dz: f64) {
        self.position = self.position.offset(Delta::new(dx, dy, dz));
    }

    /// Stage was homed by firmware; belief is back at zero
    pub fn reset(&mut self) {
        self.position = Position::ORIGIN;
    }
}

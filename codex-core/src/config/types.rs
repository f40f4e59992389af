//! Configuration type definitions
//!
//! These types describe one physical rig. They are read once at startup
//! and never change during a run.

use heapless::Vec;

use crate::motion::Position;
use crate::traits::Label;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length (card names)
pub const MAX_LABEL_LEN: usize = 48;

/// Maximum special-case labels
pub const MAX_SPECIAL_LABELS: usize = 8;

/// Descent step when the caller has no better value
pub const DEFAULT_DESCENT_STEP_MM: f64 = 0.5;

/// Card routed to the special bin by default
pub const DEFAULT_SPECIAL_LABEL: &str = "Colossal Dreadmaw";

/// Front position used for manual tool attachment
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrontConfig {
    /// X the head slides to
    pub x: f64,
    /// Z the bed drops to (negative lowers the bed)
    pub z: f64,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self { x: 300.0, z: -60.0 }
    }
}

/// Input stack location
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackConfig {
    pub x: f64,
    pub y: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self { x: 180.0, y: 200.0 }
    }
}

/// Motion reference points (absolute, relative to firmware zero)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Where the head goes right after a firmware home
    pub post_home: Position,
    /// Manual attachment position
    pub front: FrontConfig,
    /// Input stack XY
    pub input_stack: StackConfig,
    /// Travel height above the input stack
    pub safe_z: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            post_home: Position::new(180.0, 20.0, 40.0),
            front: FrontConfig::default(),
            input_stack: StackConfig::default(),
            safe_z: 60.0,
        }
    }
}

/// Contact descent parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DescentConfig {
    /// Distance lowered per step
    pub step_mm: f64,
    /// Give up after this much downward travel
    pub max_travel_mm: Option<f64>,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            step_mm: DEFAULT_DESCENT_STEP_MM,
            max_travel_mm: Some(80.0),
        }
    }
}

/// Bin routing parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Distance between adjacent bins
    pub tile_step_mm: f64,
    /// Height added above post-home Z before any lateral move
    pub clearance_mm: f64,
    /// Labels that go to the special bin
    pub special_labels: Vec<Label, MAX_SPECIAL_LABELS>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let mut special_labels = Vec::new();
        let mut label = Label::new();
        // Fits: the default label is well under MAX_LABEL_LEN
        let _ = label.push_str(DEFAULT_SPECIAL_LABEL);
        let _ = special_labels.push(label);

        Self {
            tile_step_mm: 70.0,
            clearance_mm: 35.0,
            special_labels,
        }
    }
}

/// Fixed waits standing in for motion-complete feedback
///
/// The stage never reports when a move finished, so every phase waits a
/// conservative fixed interval instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Wait after the firmware home command
    pub home_settle_ms: u32,
    /// Wait after every jog that was actually sent
    pub move_settle_ms: u32,
    /// Wait between sort cycle phases
    pub pause_ms: u32,
    /// Wait between descent steps
    pub descent_poll_ms: u32,
    /// Button polling interval
    pub button_poll_ms: u32,
    /// Fan spool up and spool down time
    pub suction_spin_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            home_settle_ms: 2000,
            move_settle_ms: 100,
            pause_ms: 8000,
            descent_poll_ms: 50,
            button_poll_ms: 50,
            suction_spin_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// No waiting at all (simulation and tests)
    pub const fn instant() -> Self {
        Self {
            home_settle_ms: 0,
            move_settle_ms: 0,
            pause_ms: 0,
            descent_poll_ms: 0,
            button_poll_ms: 0,
            suction_spin_ms: 0,
        }
    }
}

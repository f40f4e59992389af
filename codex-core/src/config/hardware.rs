//! Hardware configuration types
//!
//! Pin assignments and camera settings. These are consumed by the drivers
//! and the vision pipeline, never by the sorting logic itself. Pull-ups and
//! camera settings are applied by the platform GPIO and camera bindings when
//! they open the device; the simulated rig has no use for them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    /// GPIO pin number (BCM numbering)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up; applied by the platform GPIO binding when it
    /// configures the input, not by the drivers in this workspace
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an active-low input with pull-up, the usual wiring for a
    /// switch to ground
    pub const fn switch_to_ground(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }

    /// Logical state for a raw pin level
    pub const fn is_active(&self, level_high: bool) -> bool {
        level_high != self.inverted
    }

    /// Raw pin level that produces a logical state
    pub const fn level_for(&self, active: bool) -> bool {
        active != self.inverted
    }
}

/// Rig pin assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinsConfig {
    /// Card detect / operator button
    pub contact: PinConfig,
    /// Suction fan driver
    pub suction: PinConfig,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            contact: PinConfig::switch_to_ground(12),
            suction: PinConfig::new(23),
        }
    }
}

/// Camera settings
///
/// Passed through to the camera binding that produces frames for the
/// recognizer. Nothing in the sorting loop reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraConfig {
    /// Video device index
    pub index: u8,
    /// Manual focus value
    pub focus: u16,
    /// Frames discarded after opening the device
    pub warmup_frames: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            focus: 200,
            warmup_frames: 10,
        }
    }
}

//! Routing table
//!
//! Every bin sits one tile step away from the post-home position. Which
//! neighbour a card goes to depends only on its label:
//!
//! | Label            | Bin          | Offset            |
//! |------------------|--------------|-------------------|
//! | absent or empty  | `Unknown`    | `-tile_step` on X |
//! | special label    | `Special`    | `+tile_step` on X |
//! | anything else    | `Identified` | `+tile_step` on Y |

use heapless::Vec;

use crate::config::{RoutingConfig, MAX_SPECIAL_LABELS};
use crate::motion::{Destination, Position};
use crate::traits::Label;

/// Sorting bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bin {
    /// Card could not be read
    Unknown,
    /// Card matched a special-case label
    Special,
    /// Card was read and is not special
    Identified,
}

impl Bin {
    pub const ALL: [Bin; 3] = [Bin::Unknown, Bin::Special, Bin::Identified];

    /// Stable index, for per-bin counters
    pub const fn index(self) -> usize {
        match self {
            Bin::Unknown => 0,
            Bin::Special => 1,
            Bin::Identified => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Bin::Unknown => "unknown",
            Bin::Special => "special",
            Bin::Identified => "identified",
        }
    }
}

/// Static routing table built from the rig configuration
#[derive(Debug, Clone)]
pub struct RoutingTable {
    post_home: Position,
    tile_step_mm: f64,
    clearance_mm: f64,
    special_labels: Vec<Label, MAX_SPECIAL_LABELS>,
}

impl RoutingTable {
    /// Create a routing table
    pub fn new(post_home: Position, config: &RoutingConfig) -> Self {
        Self {
            post_home,
            tile_step_mm: config.tile_step_mm,
            clearance_mm: config.clearance_mm,
            special_labels: config.special_labels.clone(),
        }
    }

    /// Pick the bin for a classification result
    pub fn bin_for(&self, classification: Option<&str>) -> Bin {
        match classification {
            None | Some("") => Bin::Unknown,
            Some(label) if self.is_special(label) => Bin::Special,
            Some(_) => Bin::Identified,
        }
    }

    /// Resolve a classification result to a drop destination
    ///
    /// Pure: the same input always yields the same destination, and exactly
    /// one lateral offset is applied.
    pub fn resolve(&self, classification: Option<&str>) -> Destination {
        self.destination(self.bin_for(classification))
    }

    /// Drop destination for a bin
    pub fn destination(&self, bin: Bin) -> Destination {
        let mut x = self.post_home.x;
        let mut y = self.post_home.y;

        match bin {
            Bin::Unknown => x -= self.tile_step_mm,
            Bin::Special => x += self.tile_step_mm,
            Bin::Identified => y += self.tile_step_mm,
        }

        Destination {
            x,
            y,
            z: self.post_home.z + self.clearance_mm,
        }
    }

    /// Check if a label routes to the special bin
    pub fn is_special(&self, label: &str) -> bool {
        self.special_labels.iter().any(|s| s.as_str() == label)
    }

    pub fn tile_step_mm(&self) -> f64 {
        self.tile_step_mm
    }

    pub fn clearance_mm(&self) -> f64 {
        self.clearance_mm
    }
}

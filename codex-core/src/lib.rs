//! Board-agnostic core logic for the card sorter
//!
//! This crate contains all logic that does not touch the stage, the GPIO
//! lines or the camera:
//!
//! - Collaborator traits (stage, contact sensor, suction, vision)
//! - Dead-reckoned position tracking for a relative-jog stage
//! - Descent travel guard
//! - Bin routing table
//! - Setup and sort cycle state machine
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod motion;
pub mod routing;
pub mod safety;
pub mod state;
pub mod traits;

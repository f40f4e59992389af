//! Host controller for the card sorting rig
//!
//! Owns everything that waits, logs, or talks to a collaborator:
//!
//! - Motion driver (absolute requests over a relative-jog stage)
//! - Contact descent
//! - Cycle orchestrator (setup gates and sort cycles)
//! - Rig configuration loading
//! - Simulated rig for dry runs

pub mod config;
pub mod controller;
pub mod delay;
pub mod error;
pub mod motion;
pub mod sim;
pub mod smoke;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{load_config, parse_config, RigConfig};
pub use controller::{CycleOrchestrator, Rig, RunSummary};
pub use error::{ConfigError, RunError};
pub use motion::{ContactDescent, DescentReport, MotionDriver};

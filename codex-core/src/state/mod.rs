//! State machine for a sorting run
//!
//! Defines the authoritative sequencing of setup and sort cycles.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::CycleState;

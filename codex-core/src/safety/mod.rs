//! Safety limits
//!
//! Guards that stop motion before the head rams into something.

pub mod travel;

pub use travel::{GuardStatus, TravelGuard};

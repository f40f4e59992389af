//! Configuration types
//!
//! Board-agnostic configuration structures, deserialized by the host from
//! TOML when the `serde` feature is enabled.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;

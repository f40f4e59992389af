//! Bin routing
//!
//! Turns a classification result into a drop destination.

pub mod table;

pub use table::{Bin, RoutingTable};

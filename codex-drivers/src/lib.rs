//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in codex-core on top of `embedded-hal` pins and delays:
//!
//! - Contact sensor (card detect switch)
//! - Suction fan

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod sensor;
pub mod suction;

pub use sensor::GpioContactSensor;
pub use suction::GpioSuction;

//! Suction implementations

pub mod gpio;

pub use gpio::GpioSuction;

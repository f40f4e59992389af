//! Sensor implementations

pub mod contact;

pub use contact::GpioContactSensor;

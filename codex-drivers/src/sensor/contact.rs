//! GPIO contact sensor
//!
//! Card detect switch on a digital input. Usually wired to ground with a
//! pull-up, so the switch is active-low.

use codex_core::config::PinConfig;
use codex_core::traits::ContactSensor;
use embedded_hal::digital::InputPin;

/// Contact switch on an input pin
pub struct GpioContactSensor<P> {
    pin: P,
    /// Pin assignment; inverted means pressed = pin LOW
    config: PinConfig,
    /// Failed pin reads so far
    read_errors: u32,
}

impl<P: InputPin> GpioContactSensor<P> {
    /// Create a new contact sensor
    ///
    /// # Arguments
    /// - `pin`: The input pin the switch is wired to
    /// - `config`: Pin assignment; an inverted pin reads pressed when LOW
    pub fn new(pin: P, config: PinConfig) -> Self {
        Self {
            pin,
            config,
            read_errors: 0,
        }
    }

    /// Number of pin reads that failed
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }
}

impl<P: InputPin> ContactSensor for GpioContactSensor<P> {
    /// A failed read counts as not pressed; a descent then keeps going
    /// until its travel guard trips.
    fn is_pressed(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => self.config.is_active(high),
            Err(_) => {
                self.read_errors = self.read_errors.saturating_add(1);
                false
            }
        }
    }
}
